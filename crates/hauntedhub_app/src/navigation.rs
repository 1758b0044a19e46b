// SPDX-License-Identifier: MIT OR Apache-2.0
//! Route changes into mini-games.

/// Performs the actual route change once the cinematic completes
pub trait Navigator {
    /// Switch to `route` (shaped `/game/{id}`)
    fn navigate(&mut self, route: &str);
}

/// Navigator that logs the route and remembers the last one
#[derive(Debug, Default)]
pub struct LogNavigator {
    last_route: Option<String>,
}

impl LogNavigator {
    /// Create a navigator with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent route
    pub fn last_route(&self) -> Option<&str> {
        self.last_route.as_deref()
    }
}

impl Navigator for LogNavigator {
    fn navigate(&mut self, route: &str) {
        tracing::info!("Navigating to {}", route);
        self.last_route = Some(route.to_string());
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Navigator recording every route into a shared list
    #[derive(Clone, Default)]
    pub struct RecordingNavigator {
        pub routes: Rc<RefCell<Vec<String>>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, route: &str) {
            self.routes.borrow_mut().push(route.to_string());
        }
    }
}
