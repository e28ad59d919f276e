use tokio::sync::broadcast;

/// A request for the host application to move to another route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: String,
}

impl Navigation {
    pub fn to(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }
}

/// How the client layer tells its host where to go.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Navigation);
}

/// Fans navigation requests out to every subscriber.
#[derive(Debug, Clone)]
pub struct BroadcastNavigator {
    sender: broadcast::Sender<Navigation>,
}

impl BroadcastNavigator {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Navigation> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for BroadcastNavigator {
    fn navigate(&self, to: Navigation) {
        tracing::info!(route = %to.route, "Navigation requested");
        // No subscribers is fine: nobody is listening for redirects.
        let _ = self.sender.send(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_navigation() {
        let navigator = BroadcastNavigator::new();
        let mut first = navigator.subscribe();
        let mut second = navigator.subscribe();

        navigator.navigate(Navigation::to("/login"));

        assert_eq!(first.recv().await.unwrap(), Navigation::to("/login"));
        assert_eq!(second.recv().await.unwrap().route, "/login");
    }

    #[test]
    fn navigate_without_subscribers_does_not_panic() {
        BroadcastNavigator::new().navigate(Navigation::to("/login"));
    }
}
