//! Plugin hook registry.
//!
//! Hooks are side-effecting callbacks invoked at fixed extension points with
//! a page-type-tagged context. They run synchronously, in registration order,
//! and their results are ignored; they act only through side effects on state
//! they already have access to. Invalid entries are rejected at registration
//! time rather than checked per call.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{PageMetadata, SiteMetadata};

/// Context handed to a hook, tagged by page type.
#[derive(Clone, Copy, Debug)]
pub enum HookContext<'a> {
    /// The site index is about to render.
    Index { site: &'a SiteMetadata },
    /// A post is about to render.
    Post {
        site: &'a SiteMetadata,
        post: &'a PageMetadata,
    },
}

impl HookContext<'_> {
    /// Page-type tag for logging.
    #[must_use]
    pub fn page_type(&self) -> &'static str {
        match self {
            Self::Index { .. } => "index",
            Self::Post { .. } => "post",
        }
    }
}

/// A registered extension point callback.
pub trait Hook: Send + Sync {
    /// Hook name, for diagnostics. Must be non-empty.
    fn name(&self) -> &str;

    /// Run the hook. Return values don't exist by contract; hooks work
    /// through side effects only.
    fn invoke(&self, ctx: &HookContext<'_>, options: &Value);
}

struct RegisteredHook {
    hook: Box<dyn Hook>,
    options: Value,
}

/// Ordered collection of hooks; registration order is invocation order.
#[derive(Default)]
pub struct HookRegistry {
    entries: Vec<RegisteredHook>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook with its options.
    ///
    /// Entries with an empty name are dropped here, with a warning, so the
    /// render path never has to validate them.
    pub fn register(&mut self, hook: Box<dyn Hook>, options: Value) {
        if hook.name().is_empty() {
            warn!("dropping hook with empty name, skipped");
            return;
        }
        self.entries.push(RegisteredHook { hook, options });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Invoke every hook in registration order.
    pub fn run(&self, ctx: &HookContext<'_>) {
        for entry in &self.entries {
            debug!(
                "run hook {:?} on {} page",
                entry.hook.name(),
                ctx.page_type()
            );
            entry.hook.invoke(ctx, &entry.options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_support;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Hook that records `<name>:<page type>:<options>` into a shared log.
    struct Recorder {
        name: String,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Hook for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn invoke(&self, ctx: &HookContext<'_>, options: &Value) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}:{}", self.name, ctx.page_type(), options));
        }
    }

    #[test]
    fn runs_hooks_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        for name in ["first", "second", "third"] {
            registry.register(
                Box::new(Recorder {
                    name: name.to_owned(),
                    log: Arc::clone(&log),
                }),
                json!(null),
            );
        }

        assert_eq!(registry.len(), 3);

        let site = test_support::site(vec![]);
        registry.run(&HookContext::Index { site: &site });

        let entries = log.lock().unwrap();
        assert_eq!(
            *entries,
            vec!["first:index:null", "second:index:null", "third:index:null"]
        );
    }

    #[test]
    fn passes_post_context_and_options() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.register(
            Box::new(Recorder {
                name: "tagger".to_owned(),
                log: Arc::clone(&log),
            }),
            json!({"color": "red"}),
        );

        let page = test_support::page("p1", true, 0);
        let site = test_support::site(vec![page.clone()]);
        registry.run(&HookContext::Post {
            site: &site,
            post: &page,
        });

        assert_eq!(*log.lock().unwrap(), vec![r#"tagger:post:{"color":"red"}"#]);
    }

    #[test]
    fn rejects_empty_name_at_registration() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.register(
            Box::new(Recorder {
                name: String::new(),
                log: Arc::clone(&log),
            }),
            json!(null),
        );

        assert!(registry.is_empty());

        let site = test_support::site(vec![]);
        registry.run(&HookContext::Index { site: &site });
        assert!(log.lock().unwrap().is_empty());
    }
}
