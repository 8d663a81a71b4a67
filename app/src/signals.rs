use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Quit request raised from outside the event loop (Ctrl+C / SIGTERM).
#[derive(Clone, Default)]
pub struct QuitSignal {
    flag: Arc<AtomicBool>,
}

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn install_ctrlc_handler(&self) -> anyhow::Result<()> {
        let s = self.clone();
        ctrlc::set_handler(move || s.raise())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let a = QuitSignal::new();
        let b = a.clone();
        assert!(!b.is_raised());
        a.raise();
        assert!(b.is_raised());
    }
}
