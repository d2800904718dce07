//! Process-wide cached engine handle.
//!
//! The first caller pays for detecting the accelerator and instantiating the
//! engine; every later caller gets a clone of the same handle. There is no
//! invalidation. A failed load is not remembered, so the next caller tries
//! again.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::device::DevicePreference;
use crate::{BoxError, VoiceCloneError, VoiceCloningEngine};

/// Shared, lockable engine handle.
pub type SharedEngine<E> = Arc<Mutex<E>>;

type LoadFn<E> = dyn Fn(&str, bool) -> Result<E, BoxError> + Send + Sync;

/// Lazily instantiated singleton engine.
pub struct ModelCache<E> {
    model_name: String,
    device: DevicePreference,
    load: Box<LoadFn<E>>,
    slot: Mutex<Option<SharedEngine<E>>>,
    loads: AtomicUsize,
}

impl<E> ModelCache<E> {
    /// Create a cache that builds its engine with `load(model_name, use_accelerator)`.
    pub fn new<F>(model_name: impl Into<String>, device: DevicePreference, load: F) -> Self
    where
        F: Fn(&str, bool) -> Result<E, BoxError> + Send + Sync + 'static,
    {
        Self {
            model_name: model_name.into(),
            device,
            load: Box::new(load),
            slot: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Return the cached engine, instantiating it on first use.
    ///
    /// Blocks for as long as the engine takes to load. Concurrent first callers
    /// wait for the one load in progress instead of starting their own.
    pub fn get_or_load(&self) -> Result<SharedEngine<E>, VoiceCloneError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }

        let use_accelerator = self.device.use_accelerator();
        log::info!(
            "Loading model '{}'. CUDA available: {}",
            self.model_name,
            use_accelerator
        );

        self.loads.fetch_add(1, Ordering::SeqCst);
        let engine = (self.load)(&self.model_name, use_accelerator).map_err(|source| {
            log::error!("Model '{}' failed to load: {source}", self.model_name);
            VoiceCloneError::ModelLoad {
                model: self.model_name.clone(),
                source,
            }
        })?;

        let engine = Arc::new(Mutex::new(engine));
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Whether an engine has been instantiated.
    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// How many times instantiation has been attempted.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Model identifier the engine is loaded with.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl<E> ModelCache<E>
where
    E: VoiceCloningEngine + Default,
{
    /// Create a cache for a default-constructed engine.
    ///
    /// `params` turns the accelerator flag into the engine's load parameters.
    pub fn for_engine<P>(model_name: impl Into<String>, device: DevicePreference, params: P) -> Self
    where
        P: Fn(bool) -> E::ModelParams + Send + Sync + 'static,
    {
        Self::new(model_name, device, move |name, use_accelerator| {
            let mut engine = E::default();
            engine.load_model_with_params(name, params(use_accelerator))?;
            Ok(engine)
        })
    }
}
