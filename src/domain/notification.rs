use super::Entry;

/// Body sent when only the title and click target matter. ntfy rejects an
/// empty message, so a zero-width space stands in.
pub const EMPTY_BODY: &str = "\u{200b}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

impl Notification {
    pub fn from_entry(entry: &Entry) -> Self {
        let link = if entry.link.is_empty() {
            None
        } else {
            Some(entry.link.clone())
        };

        Self {
            title: entry.title.clone(),
            body: EMPTY_BODY.to_string(),
            link,
        }
    }

    /// One-line form used in logs and dry runs: "{title} <{link}>"
    pub fn format(&self) -> String {
        match &self.link {
            Some(link) => format!("{} <{}>", self.title, link),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_from_entry() {
        let entry = Entry::new("guid-1", "Deal A")
            .with_link("https://example.com/deal-a")
            .with_description("<p>4 GB RAM for $2/month</p>");

        let notification = Notification::from_entry(&entry);

        assert_eq!(notification.title, "Deal A");
        assert_eq!(notification.body, EMPTY_BODY);
        assert_eq!(notification.link.as_deref(), Some("https://example.com/deal-a"));
    }

    #[test]
    fn test_notification_without_link() {
        let entry = Entry::new("guid-2", "Deal B");
        let notification = Notification::from_entry(&entry);

        assert!(notification.link.is_none());
        assert_eq!(notification.format(), "Deal B");
    }

    #[test]
    fn test_notification_format_with_link() {
        let notification = Notification {
            title: "Deal A".to_string(),
            body: EMPTY_BODY.to_string(),
            link: Some("https://example.com/a".to_string()),
        };

        assert_eq!(notification.format(), "Deal A <https://example.com/a>");
    }
}
