/// Watches the last rendered feed row and asks for the next page when it
/// comes into view.
///
/// The terminal analogue of a viewport intersection observer: the view layer
/// retargets the sentinel at the identity (dex id) of the last item of the
/// visible slice after every render, then reports whether that row is
/// currently on screen. Retargeting to a different identity discards the
/// previous watcher state first, so each target fires at most once and a
/// growing slice re-arms naturally.
#[derive(Debug, Default)]
pub struct ScrollSentinel {
    target: Option<u32>,
    fired: bool,
}

impl ScrollSentinel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the sentinel at the current last rendered element. A changed
    /// identity re-arms; the same identity keeps its fired state so one
    /// target never triggers twice.
    pub fn retarget(&mut self, target: Option<u32>) {
        if self.target != target {
            self.target = target;
            self.fired = false;
        }
    }

    /// Report visibility of the target. Returns true exactly once per
    /// target, and only while more data is available and no fetch is
    /// loading.
    pub fn observe(&mut self, visible: bool, has_more: bool, loading: bool) -> bool {
        if loading || self.fired || !visible || !has_more || self.target.is_none() {
            return false;
        }
        self.fired = true;
        true
    }
}
