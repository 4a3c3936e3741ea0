use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, error, info};

use super::{GameModule, ModuleHandle};
use crate::error::LoadError;
use crate::games::GameKind;

/// A pending or finished load. Clones resolve to the same outcome.
pub type LoadFuture = Shared<LocalBoxFuture<'static, Result<ModuleHandle, LoadError>>>;

/// Instantiation in progress; the error is a human-readable reason.
pub type Instantiation = LocalBoxFuture<'static, Result<Box<dyn GameModule>, String>>;

/// Acquires the backing resource for a module and instantiates it.
pub trait ModuleSource {
    fn instantiate(&self) -> Instantiation;
}

impl<F> ModuleSource for F
where
    F: Fn() -> Instantiation,
{
    fn instantiate(&self) -> Instantiation {
        self()
    }
}

/// Resolves module names to instances, memoized per name.
///
/// The memo stores the in-flight future itself, so concurrent requests for a
/// name that is still instantiating join the same instantiation instead of
/// starting another one. A failed load stays visible to everyone already
/// waiting on it and is evicted on the next request, which starts over.
#[derive(Default)]
pub struct ModuleRegistry {
    sources: HashMap<String, Rc<dyn ModuleSource>>,
    loads: HashMap<String, LoadFuture>,
    instantiations: HashMap<String, usize>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every bundled game registered under its module name.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in GameKind::all() {
            let kind = *kind;
            registry.register(kind.module_name(), move || -> Instantiation {
                futures::future::ready(Ok(kind.instantiate())).boxed_local()
            });
        }
        registry
    }

    pub fn register<S>(&mut self, name: &str, source: S)
    where
        S: ModuleSource + 'static,
    {
        self.sources.insert(name.to_string(), Rc::new(source));
        self.loads.remove(name);
    }

    pub fn load(&mut self, name: &str) -> LoadFuture {
        if let Some(existing) = self.loads.get(name).cloned() {
            let ready = existing.peek().map(|outcome| outcome.is_ok());
            match ready {
                Some(false) => {
                    debug!("retrying failed load of {}", name);
                    self.loads.remove(name);
                }
                Some(true) => {
                    debug!("module cache hit for {}", name);
                    return existing;
                }
                None => return existing,
            }
        }

        let future = self.instantiate(name).shared();
        self.loads.insert(name.to_string(), future.clone());
        future
    }

    /// True once `name` has a ready instance cached.
    pub fn loaded(&self, name: &str) -> bool {
        matches!(self.loads.get(name).and_then(|f| f.peek()), Some(Ok(_)))
    }

    /// How many times the source for `name` has been asked to instantiate.
    pub fn instantiation_count(&self, name: &str) -> usize {
        self.instantiations.get(name).copied().unwrap_or(0)
    }

    fn instantiate(&mut self, name: &str) -> LocalBoxFuture<'static, Result<ModuleHandle, LoadError>> {
        let name = name.to_string();
        let Some(source) = self.sources.get(&name).cloned() else {
            error!("no module registered under {}", name);
            return futures::future::ready(Err(LoadError::NotFound(name))).boxed_local();
        };

        *self.instantiations.entry(name.clone()).or_insert(0) += 1;
        let pending = source.instantiate();
        async move {
            match pending.await {
                Ok(module) => {
                    let handle = ModuleHandle::new(&name, module);
                    info!("loaded module {} exporting {:?}", name, handle.capabilities());
                    Ok(handle)
                }
                Err(reason) => {
                    error!("failed to initialize {}: {}", name, reason);
                    Err(LoadError::Instantiate { name, reason })
                }
            }
        }
        .boxed_local()
    }
}
