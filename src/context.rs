use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Drawing state shared by every tool in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationContext {
    /// Foreground drawing color.
    pub fg_color: Color,
    /// Background drawing color.
    pub bg_color: Color,
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self {
            fg_color: Color::BLACK,
            bg_color: Color::WHITE,
        }
    }
}

/// Handle to the session's [`ApplicationContext`].
///
/// The host publishes one handle per session and never replaces it; clones
/// point at the same state. Every accessor takes the lock for exactly one
/// read or write, so no lock is ever held across a tool call.
#[derive(Debug, Clone, Default)]
pub struct SharedContext {
    inner: Arc<RwLock<ApplicationContext>>,
}

impl SharedContext {
    pub fn new(context: ApplicationContext) -> Self {
        Self {
            inner: Arc::new(RwLock::new(context)),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ApplicationContext {
        *self.inner.read()
    }

    pub fn fg_color(&self) -> Color {
        self.inner.read().fg_color
    }

    pub fn bg_color(&self) -> Color {
        self.inner.read().bg_color
    }

    pub fn set_fg_color(&self, color: Color) {
        self.inner.write().fg_color = color;
    }

    pub fn set_bg_color(&self, color: Color) {
        self.inner.write().bg_color = color;
    }

    /// Applies `f` under a single write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut ApplicationContext) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// True if both handles refer to the same published context.
    pub fn same_as(&self, other: &SharedContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let context = SharedContext::default();
        let other = context.clone();
        other.set_fg_color(Color::RED);
        assert_eq!(context.fg_color(), Color::RED);
        assert!(context.same_as(&other));
        assert!(!context.same_as(&SharedContext::default()));
    }

    #[test]
    fn test_update_swaps_colors() {
        let context = SharedContext::new(ApplicationContext {
            fg_color: Color::RED,
            bg_color: Color::BLUE,
        });
        context.update(|ctx| std::mem::swap(&mut ctx.fg_color, &mut ctx.bg_color));
        assert_eq!(context.snapshot().fg_color, Color::BLUE);
        assert_eq!(context.bg_color(), Color::RED);
    }

    #[test]
    fn test_shared_across_threads() {
        let context = SharedContext::default();
        let writer = context.clone();
        std::thread::spawn(move || writer.set_bg_color(Color::GREEN))
            .join()
            .unwrap();
        assert_eq!(context.bg_color(), Color::GREEN);
    }
}
