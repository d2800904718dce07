//! HTML rendering of the single-page form.
//!
//! Pages are rendered server-side as plain strings; the only script is the
//! busy indicator shown while a generation request is in flight.

use std::fmt::Write;

use base64::Engine as _;

use crate::session::{Banner, BannerLevel};
use crate::upload::ALLOWED_EXTENSIONS;

pub const TITLE: &str = "Coqui XTTS Voice Cloning App";
pub const ABOUT_URL: &str = "https://github.com/coqui-ai/TTS";

/// Everything a fully rendered page shows.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub model_name: &'a str,
    /// Banners in display order, model status first.
    pub banners: &'a [Banner],
    /// Text to pre-fill the text area with.
    pub text: &'a str,
    /// WAV bytes for the audio player.
    pub audio: Option<&'a [u8]>,
}

/// The form page with banners and, after a successful run, the player.
pub fn render_page(view: &PageView<'_>) -> String {
    let mut body = String::new();

    let (status, results) = view.banners.split_at(view.banners.len().min(1));
    render_banners(&mut body, status);

    let _ = write!(
        body,
        r#"<h1>{title} &#127897;&#65039;</h1>
<p>Use the Coqui XTTS v2 model for instant voice cloning.</p>
<p><strong>How to use:</strong></p>
<ol>
  <li><strong>Upload reference audio:</strong> upload an audio file (e.g. .wav, .mp3) with the voice you want to clone. Clear audio of 10-30 seconds gives the best results.</li>
  <li><strong>Write text:</strong> type the text you want spoken in that voice.</li>
  <li><strong>Generate:</strong> click the 'Generate Audio' button.</li>
</ol>
<form method="post" action="/generate" enctype="multipart/form-data" onsubmit="document.getElementById('busy').hidden = false;">
  <label for="reference_audio">Upload reference audio file (WAV/MP3)</label>
  <input type="file" id="reference_audio" name="reference_audio" accept="{accept}">
  <label for="text">Write your text here:</label>
  <textarea id="text" name="text" rows="6">{text}</textarea>
  <button type="submit">Generate Audio</button>
</form>
<p id="busy" class="busy" hidden>Processing... the model is generating the voice...</p>
"#,
        title = TITLE,
        accept = accept_attribute(),
        text = escape_html(view.text),
    );

    render_banners(&mut body, results);

    if let Some(audio) = view.audio {
        let _ = write!(
            body,
            r#"<audio controls src="data:audio/wav;base64,{}"></audio>
"#,
            base64::engine::general_purpose::STANDARD.encode(audio)
        );
    }

    layout(&body, Some(view.model_name))
}

/// The page shown when the model cannot be loaded. Nothing else renders.
pub fn render_load_failure(message: &str) -> String {
    let mut body = String::new();
    render_banners(&mut body, &[Banner::error(message)]);
    layout(&body, None)
}

fn render_banners(out: &mut String, banners: &[Banner]) {
    for banner in banners {
        let _ = writeln!(
            out,
            r#"<div class="banner {}">{}</div>"#,
            banner_class(banner.level),
            escape_html(&banner.message)
        );
    }
}

fn banner_class(level: BannerLevel) -> &'static str {
    match level {
        BannerLevel::Success => "success",
        BannerLevel::Info => "info",
        BannerLevel::Warning => "warning",
        BannerLevel::Error => "error",
    }
}

fn accept_attribute() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn layout(main: &str, model_name: Option<&str>) -> String {
    let sidebar = match model_name {
        Some(name) => format!(
            r#"<aside>
  <h2>About</h2>
  <div class="banner info">This app uses the <a href="{ABOUT_URL}">Coqui XTTS</a> model (<code>{}</code>) served from a Rust web front-end.</div>
</aside>
"#,
            escape_html(name)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{TITLE}</title>
<style>
body {{ font-family: sans-serif; margin: 0; display: flex; }}
main {{ flex: 1; max-width: 46rem; padding: 2rem; }}
aside {{ width: 16rem; padding: 2rem 1rem; background: #f0f2f6; min-height: 100vh; }}
label {{ display: block; margin-top: 1rem; }}
textarea {{ width: 100%; }}
button {{ margin-top: 1rem; }}
audio {{ width: 100%; margin-top: 1rem; }}
.banner {{ padding: 0.75rem 1rem; margin: 0.5rem 0; border-radius: 0.4rem; }}
.success {{ background: #dff5e3; }}
.info {{ background: #e3eefc; }}
.warning {{ background: #fff5d6; }}
.error {{ background: #fde2e2; }}
</style>
</head>
<body>
{sidebar}<main>
{main}</main>
</body>
</html>
"#
    )
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(banners: &'a [Banner], audio: Option<&'a [u8]>) -> PageView<'a> {
        PageView {
            model_name: "xtts",
            banners,
            text: "Hello <there>",
            audio,
        }
    }

    #[test]
    fn page_has_every_control() {
        let html = render_page(&view(&[], None));
        assert!(html.contains(TITLE));
        assert!(html.contains(r#"type="file""#));
        assert!(html.contains(r#"accept=".wav,.mp3""#));
        assert!(html.contains("<textarea"));
        assert!(html.contains("Generate Audio</button>"));
        assert!(html.contains(ABOUT_URL));
        assert!(html.contains("Hello &lt;there&gt;"));
        assert!(!html.contains("<audio"));
    }

    #[test]
    fn player_embeds_the_wav_bytes() {
        let html = render_page(&view(&[], Some(b"RIFF")));
        assert!(html.contains(r#"src="data:audio/wav;base64,UklGRg==""#));
    }

    #[test]
    fn banners_are_escaped_and_classed() {
        let banners = [
            Banner::success("loaded"),
            Banner::warning("<b>careful</b>"),
        ];
        let html = render_page(&view(&banners, None));
        assert!(html.contains(r#"<div class="banner success">loaded</div>"#));
        assert!(html.contains(r#"<div class="banner warning">&lt;b&gt;careful&lt;/b&gt;</div>"#));
    }

    #[test]
    fn load_failure_renders_nothing_but_the_error() {
        let html = render_load_failure("Failed to load model 'x': boom");
        assert!(html.contains(r#"<div class="banner error">Failed to load model &#39;x&#39;: boom</div>"#));
        assert!(!html.contains("<form"));
        assert!(!html.contains("<aside>"));
    }
}
