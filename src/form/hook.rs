/// Hook into an outer validation framework, told whenever the card form
/// drops its error highlight.
pub trait ValidationHook {
    fn clear_validation(&mut self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidationHook;

impl ValidationHook for NoopValidationHook {
    fn clear_validation(&mut self) {}
}

impl<F: FnMut()> ValidationHook for F {
    fn clear_validation(&mut self) {
        self()
    }
}
