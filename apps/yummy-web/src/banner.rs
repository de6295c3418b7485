use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

/// Mount point of the static assets directory.
pub const ASSETS_ROUTE: &str = "/assets";

pub const BANNER_IMAGES: [&str; 4] = [
    "/assets/bowl1.jpg",
    "/assets/bowl2.jpg",
    "/assets/bowl3.jpg",
    "/assets/bowl4.jpg",
];

pub const ROTATION_PERIOD: Duration = Duration::from_secs(10);

/// Index of the visible hero image. Advanced by [`BannerTicker`], read by the renderer.
#[derive(Debug)]
pub struct RotatingBanner {
    index: AtomicUsize,
    len: usize,
}

impl RotatingBanner {
    pub fn new(len: usize) -> Self {
        Self {
            index: AtomicUsize::new(0),
            len: len.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    pub fn advance(&self) -> usize {
        let len = self.len;
        let previous = self
            .index
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |i| Some((i + 1) % len))
            .unwrap_or_default();
        (previous + 1) % len
    }
}

/// Background task advancing a [`RotatingBanner`] on a fixed period.
///
/// Dropping the ticker aborts the task.
pub struct BannerTicker {
    handle: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl BannerTicker {
    pub fn spawn(banner: Arc<RotatingBanner>, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let index = banner.advance();
                        debug!("Banner rotated to image {}", index);
                    }
                    _ = &mut shutdown_rx => {
                        debug!("Banner ticker received shutdown signal");
                        break;
                    }
                }
            }
        });

        Self {
            handle: Some(handle),
            shutdown: Some(shutdown_tx),
        }
    }

    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!("Banner ticker ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for BannerTicker {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
