use std::path::PathBuf;
use std::time::Instant;

use voice_clone_rs::{
    device::cuda_available,
    engines::coqui::{CoquiEngine, CoquiModelParamsBuilder, XTTS_V2},
    VoiceCloningEngine,
};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    let reference = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: clone_once <reference.wav> [text]")?;
    let text = std::env::args().nth(2).unwrap_or_else(|| {
        "Hello! This is my cloned voice, speaking text I never recorded.".to_string()
    });

    let params = CoquiModelParamsBuilder::default()
        .use_cuda(cuda_available())
        .build()?;

    let mut engine = CoquiEngine::new();
    let load_start = Instant::now();
    engine.load_model_with_params(XTTS_V2, params)?;
    println!(
        "Engine ready in {:.2?} (cuda: {})",
        load_start.elapsed(),
        engine.uses_cuda()
    );

    let synth_start = Instant::now();
    let result = engine.synthesize(&text, &reference, "en")?;
    let synth_dur = synth_start.elapsed();

    let audio_duration = result.duration_secs();
    println!(
        "Cloned {:.2}s of audio in {:.2?} ({:.2}x real-time)",
        audio_duration,
        synth_dur,
        audio_duration / synth_dur.as_secs_f64()
    );

    result.write_wav(&PathBuf::from("output_clone.wav"))?;
    println!("Saved to output_clone.wav");

    engine.unload_model();
    Ok(())
}
