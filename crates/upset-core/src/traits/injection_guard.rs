use std::sync::Arc;

/// Upstream classifier for adversarial / prompt-injection content.
/// Consumed only by the persona layer, never by the numeric core.
pub trait IInjectionGuard: Send + Sync {
    fn is_injection(&self, raw_message: &str) -> bool;
}

impl<T: IInjectionGuard + ?Sized> IInjectionGuard for Arc<T> {
    fn is_injection(&self, raw_message: &str) -> bool {
        (**self).is_injection(raw_message)
    }
}
