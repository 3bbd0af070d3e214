use std::collections::VecDeque;

/// Fixed-capacity ring buffer that keeps the newest entries.
///
/// Appending past capacity drops the oldest entry. `total` keeps counting
/// every entry ever pushed.
#[derive(Debug, Clone)]
pub struct RecentWindow<T> {
    entries: VecDeque<T>,
    capacity: usize,
    total: u64,
}

impl<T> RecentWindow<T> {
    /// Create a window holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    pub fn push(&mut self, entry: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.total += 1;
    }

    /// Number of entries pushed since creation.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl<T: Clone> RecentWindow<T> {
    /// Clone the retained entries, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity() {
        let mut window = RecentWindow::new(3);
        window.push(1);
        window.push(2);
        assert_eq!(window.to_vec(), vec![1, 2]);
        assert_eq!(window.total(), 2);
    }

    #[test]
    fn test_push_past_capacity_drops_oldest() {
        let mut window = RecentWindow::new(3);
        for i in 1..=5 {
            window.push(i);
        }
        assert_eq!(window.to_vec(), vec![3, 4, 5]);
        assert_eq!(window.total(), 5);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut window = RecentWindow::new(0);
        window.push("a");
        window.push("b");
        assert_eq!(window.to_vec(), vec!["b"]);
        assert_eq!(window.total(), 2);
    }
}
