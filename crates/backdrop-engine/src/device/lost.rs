use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-shot "context lost" status shared between wgpu and the render loop.
///
/// wgpu reports loss through a callback that may run on another thread; the
/// loop only ever reads the flag once per iteration.
#[derive(Debug, Clone, Default)]
pub struct ContextLoss {
    lost: Arc<AtomicBool>,
}

impl ContextLoss {
    /// Registers a device-lost callback on `device` and returns the flag it sets.
    pub fn watch(device: &wgpu::Device) -> Self {
        let loss = Self::default();
        let flag = loss.clone();

        device.set_device_lost_callback(move |reason, message| {
            match reason {
                wgpu::DeviceLostReason::Destroyed => {
                    log::debug!("GPU device destroyed: {message}");
                }
                _ => log::warn!("GPU device lost ({reason:?}): {message}"),
            }
            flag.signal();
        });

        loss
    }

    /// Marks the context as lost.
    pub fn signal(&self) {
        self.lost.store(true, Ordering::Release);
    }

    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_flag_is_not_lost() {
        assert!(!ContextLoss::default().is_lost());
    }

    #[test]
    fn signal_is_visible_through_clones() {
        let loss = ContextLoss::default();
        let observer = loss.clone();
        loss.signal();
        assert!(observer.is_lost());
    }

    #[test]
    fn signal_from_another_thread() {
        let loss = ContextLoss::default();
        let remote = loss.clone();
        std::thread::spawn(move || remote.signal())
            .join()
            .expect("signalling thread panicked");
        assert!(loss.is_lost());
    }
}
