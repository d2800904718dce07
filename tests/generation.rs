mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{dir_entries, tone, FakeEngine, Script};
use voice_clone_rs::device::DevicePreference;
use voice_clone_rs::loader::ModelCache;
use voice_clone_rs::session::{generate, BannerLevel, GenerateSettings};
use voice_clone_rs::upload::ReferenceUpload;
use voice_clone_rs::{SynthesisResult, VoiceCloneError};

fn settings(dir: &tempfile::TempDir) -> GenerateSettings {
    GenerateSettings {
        work_dir: dir.path().to_path_buf(),
        language: "en".to_string(),
    }
}

fn upload(bytes: &[u8]) -> ReferenceUpload {
    ReferenceUpload::new("speaker.wav", bytes.to_vec()).expect("wav is allowed")
}

#[test]
fn missing_upload_warns_and_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, recorder) = FakeEngine::new(Script::Succeed);

    let outcome = generate(&mut engine, &settings(&dir), None, "Hello there");

    assert_eq!(outcome.banners.len(), 1);
    assert_eq!(outcome.banners[0].level, BannerLevel::Warning);
    assert_eq!(
        outcome.banners[0].message,
        VoiceCloneError::MissingUpload.to_string()
    );
    assert!(outcome.audio.is_none());
    assert!(dir_entries(dir.path()).is_empty());
    assert_eq!(recorder.lock().unwrap().calls, 0);
}

#[test]
fn empty_text_warns_without_invoking_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, recorder) = FakeEngine::new(Script::Succeed);

    let outcome = generate(&mut engine, &settings(&dir), Some(&upload(b"voice")), "");

    assert_eq!(outcome.banners.len(), 1);
    assert_eq!(outcome.banners[0].level, BannerLevel::Warning);
    assert!(outcome.banners[0].message.contains("enter some text"));
    assert!(dir_entries(dir.path()).is_empty());
    assert_eq!(recorder.lock().unwrap().calls, 0);
}

#[test]
fn successful_run_presents_audio_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, recorder) = FakeEngine::new(Script::Succeed);
    let text = "Hello, this is a test of instant voice cloning with XTTS model.";

    let outcome = generate(&mut engine, &settings(&dir), Some(&upload(b"voice")), text);

    let levels: Vec<BannerLevel> = outcome.banners.iter().map(|b| b.level).collect();
    assert_eq!(
        levels,
        vec![BannerLevel::Info, BannerLevel::Info, BannerLevel::Success]
    );
    assert!(outcome.banners[0]
        .message
        .starts_with("Reference audio saved to: "));
    assert_eq!(outcome.banners[1].message, format!("Text to speak: {text}"));

    // The presented bytes are the engine's WAV file, verbatim.
    let audio = outcome.audio.expect("audio on success");
    let scratch = tempfile::tempdir().unwrap();
    let path = scratch.path().join("presented.wav");
    std::fs::write(&path, &audio).unwrap();
    assert_eq!(SynthesisResult::read_wav(&path).unwrap(), tone());

    assert!(dir_entries(dir.path()).is_empty());
    let rec = recorder.lock().unwrap();
    assert_eq!(rec.calls, 1);
    assert_eq!(rec.texts, vec![text.to_string()]);
    assert_eq!(rec.languages, vec!["en".to_string()]);
}

#[test]
fn failure_before_output_cleans_up_the_reference() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, recorder) = FakeEngine::new(Script::FailBeforeOutput);

    let outcome = generate(&mut engine, &settings(&dir), Some(&upload(b"voice")), "Hi");

    let last = outcome.banners.last().expect("error banner");
    assert_eq!(last.level, BannerLevel::Error);
    assert_eq!(
        last.message,
        "Audio generation failed: reference audio could not be decoded"
    );
    assert!(outcome.audio.is_none());
    assert!(dir_entries(dir.path()).is_empty());
    assert_eq!(recorder.lock().unwrap().calls, 1);
}

#[test]
fn failure_after_partial_output_cleans_up_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, _recorder) = FakeEngine::new(Script::FailAfterPartialOutput);

    let outcome = generate(&mut engine, &settings(&dir), Some(&upload(b"voice")), "Hi");

    assert!(!outcome.is_success());
    assert!(outcome
        .banners
        .iter()
        .any(|b| b.level == BannerLevel::Error && b.message.contains("vocoder crashed")));
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn form_is_usable_again_after_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (mut failing, _) = FakeEngine::new(Script::FailBeforeOutput);
    let (mut working, _) = FakeEngine::new(Script::Succeed);

    let first = generate(&mut failing, &settings(&dir), Some(&upload(b"voice")), "Hi");
    let second = generate(&mut working, &settings(&dir), Some(&upload(b"voice")), "Hi");

    assert!(!first.is_success());
    assert!(second.is_success());
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn engine_sees_exactly_the_latest_upload() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, recorder) = FakeEngine::new(Script::Succeed);

    let first = upload(b"first recording, rather long");
    let second = upload(b"second");
    generate(&mut engine, &settings(&dir), Some(&first), "Hi");
    generate(&mut engine, &settings(&dir), Some(&second), "Hi");

    let rec = recorder.lock().unwrap();
    assert_eq!(rec.references[0], first.bytes);
    assert_eq!(rec.references[1], second.bytes);
}

#[test]
fn model_is_instantiated_once_across_generations() {
    let dir = tempfile::tempdir().unwrap();
    let instantiations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&instantiations);
    let cache = ModelCache::new("fake-xtts", DevicePreference::Cpu, move |_, use_gpu| {
        assert!(!use_gpu);
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(FakeEngine::new(Script::Succeed).0)
    });

    for _ in 0..3 {
        let engine = cache.get_or_load().unwrap();
        let mut engine = engine.lock().unwrap();
        let outcome = generate(&mut *engine, &settings(&dir), Some(&upload(b"voice")), "Hi");
        assert!(outcome.is_success());
    }

    assert_eq!(instantiations.load(Ordering::SeqCst), 1);
    assert_eq!(cache.load_count(), 1);
}

#[test]
fn mp3_references_are_accepted_and_others_rejected() {
    assert!(ReferenceUpload::new("speaker.MP3", vec![0xff, 0xfb]).is_ok());
    assert!(matches!(
        ReferenceUpload::new("speaker.m4a", vec![]),
        Err(VoiceCloneError::UnsupportedFormat(_))
    ));
}

#[test]
fn unusable_work_dir_is_an_error_banner() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, recorder) = FakeEngine::new(Script::Succeed);
    let settings = GenerateSettings {
        work_dir: dir.path().join("removed"),
        language: "en".to_string(),
    };

    let outcome = generate(&mut engine, &settings, Some(&upload(b"voice")), "Hello");

    assert_eq!(outcome.banners.len(), 1);
    assert_eq!(outcome.banners[0].level, BannerLevel::Error);
    assert!(outcome.banners[0]
        .message
        .starts_with("Audio generation failed: I/O error"));
    assert!(outcome.audio.is_none());
    assert_eq!(recorder.lock().unwrap().calls, 0);
}
