/// Offset-based window over an ordered result set
///
/// # Example
/// ```
/// use talentverify_api::domain::repositories::PageRequest;
///
/// let third = PageRequest::for_page(10, 3);
/// assert_eq!(third.offset, 20);
/// assert_eq!(third.page_number(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of items to return
    pub limit: usize,
    /// Number of items to skip
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Window for a 1-based page number
    pub fn for_page(page_size: usize, page_number: usize) -> Self {
        let page_number = page_number.max(1);
        Self {
            limit: page_size,
            offset: (page_number - 1) * page_size,
        }
    }

    /// 1-based page number of this window
    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            self.offset / self.limit + 1
        }
    }

    /// Applies the window to an already ordered in-memory sequence
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

/// Sort key plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering<F> {
    pub field: F,
    pub descending: bool,
}

impl<F> Ordering<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parses `field` / `-field` using the given key lookup
    pub fn parse(raw: &str, lookup: impl Fn(&str) -> Option<F>) -> Option<Self> {
        match raw.strip_prefix('-') {
            Some(key) => lookup(key).map(Self::desc),
            None => lookup(raw).map(Self::asc),
        }
    }

    /// Orients an ascending comparison according to the direction
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(PageRequest::for_page(10, 1), PageRequest::new(10, 0));
    }

    #[test]
    fn page_zero_is_clamped_to_first() {
        assert_eq!(PageRequest::for_page(10, 0).offset, 0);
    }

    #[test]
    fn slice_takes_window() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(PageRequest::for_page(10, 3).slice(items), vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn ordering_parses_direction_prefix() {
        let lookup = |key: &str| (key == "name").then_some("name");

        assert_eq!(Ordering::parse("name", lookup), Some(Ordering::asc("name")));
        assert_eq!(Ordering::parse("-name", lookup), Some(Ordering::desc("name")));
        assert_eq!(Ordering::parse("salary", lookup), None);
    }

    #[test]
    fn descending_reverses_comparison() {
        let ordering = Ordering::desc(());
        assert_eq!(
            ordering.apply(1.cmp(&2)),
            std::cmp::Ordering::Greater
        );
    }
}
