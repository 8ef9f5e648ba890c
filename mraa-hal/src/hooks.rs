//! Board-specific overrides of generic peripheral behaviour
//!
//! A board that needs to intervene in the generic GPIO path implements
//! [`AdvancedHooks`] and overrides only the slots it cares about. Every slot
//! has a pass-through default, so boards with no quirks use [`NoHooks`].

use core::fmt;

use crate::error::{Error, Result};
use crate::gpio::{Edge, IsrHandler};

/// Optional override slots consulted by the peripheral drivers
pub trait AdvancedHooks: fmt::Debug + Send + Sync {
    /// Runs before a GPIO line is exported for `pin`
    fn gpio_init_pre(&self, _pin: usize) -> Result<()> {
        Ok(())
    }

    /// Runs before a GPIO line is released for `pin`
    fn gpio_close_pre(&self, _pin: usize) -> Result<()> {
        Ok(())
    }

    /// Whether [`AdvancedHooks::gpio_isr_replace`] takes over interrupt setup
    fn overrides_gpio_isr(&self) -> bool {
        false
    }

    /// Interrupt setup used instead of the generic edge watcher
    fn gpio_isr_replace(&self, _pin: usize, _edge: Edge, _handler: IsrHandler) -> Result<()> {
        Err(Error::NotAvailable)
    }

    /// Tears down an interrupt installed by [`AdvancedHooks::gpio_isr_replace`]
    fn gpio_isr_exit_replace(&self, _pin: usize) -> Result<()> {
        Ok(())
    }
}

/// Hooks of a board without overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl AdvancedHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_through() {
        let hooks = NoHooks;
        assert!(hooks.gpio_init_pre(5).is_ok());
        assert!(hooks.gpio_close_pre(5).is_ok());
        assert!(!hooks.overrides_gpio_isr());
        assert!(matches!(
            hooks.gpio_isr_replace(5, Edge::Rising, Box::new(|| {})),
            Err(Error::NotAvailable)
        ));
        assert!(hooks.gpio_isr_exit_replace(5).is_ok());
    }
}
