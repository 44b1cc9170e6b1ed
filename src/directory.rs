use crate::models::Link;

/// Handle for one in-flight listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Read-through cache of the link service's listing.
///
/// Every successful write is followed by a full refresh that replaces the
/// list wholesale; there is no partial merge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkDirectory {
    links: Vec<Link>,
    stale: bool,
    issued: u64,
    applied: u64,
}

impl LinkDirectory {
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn find(&self, short_code: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.short_code == short_code)
    }

    pub fn contains(&self, short_code: &str) -> bool {
        self.find(short_code).is_some()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Marks the cached list as out of date without dropping it.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn replace(&mut self, links: Vec<Link>) {
        self.links = links;
        self.stale = false;
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Applies a listing unless a newer one already landed.
    ///
    /// Returns `false` when the listing was discarded.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, links: Vec<Link>) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        self.replace(links);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(code: &str, url: &str) -> Link {
        Link {
            short_code: code.to_string(),
            long_url: url.to_string(),
        }
    }

    #[test]
    fn replace_swaps_whole_list_and_clears_stale_flag() {
        let mut directory = LinkDirectory::default();
        directory.replace(vec![link("a", "https://a.example"), link("b", "https://b.example")]);
        directory.invalidate();
        assert!(directory.is_stale());
        assert_eq!(directory.links().len(), 2);

        directory.replace(vec![link("c", "https://c.example")]);
        assert!(!directory.is_stale());
        assert_eq!(directory.links(), &[link("c", "https://c.example")]);
        assert!(!directory.contains("a"));
    }

    #[test]
    fn late_listing_is_discarded() {
        let mut directory = LinkDirectory::default();
        let first = directory.begin_refresh();
        let second = directory.begin_refresh();

        assert!(directory.complete_refresh(second, vec![link("new", "https://new.example")]));
        assert!(!directory.complete_refresh(first, vec![link("old", "https://old.example")]));
        assert_eq!(directory.find("new").map(|l| l.long_url.as_str()), Some("https://new.example"));
        assert!(directory.find("old").is_none());
    }
}
