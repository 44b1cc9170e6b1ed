//! Client-side state of the console and the user actions that drive it.
//!
//! Reads (`list_links`, `weekly_stats`) are best effort: a failure is logged
//! and the previous state stays on screen. Writes surface their failure as
//! a notice and keep the form or draft for a retry.

use crate::client::LinkService;
use crate::directory::LinkDirectory;
use crate::edit::{EditController, EditError};
use crate::errors::ErrorKind;
use crate::form::{CreationForm, FormError};
use crate::models::{ConsoleSnapshot, EditSnapshot, Link, Notice, WeeklyChart, WeeklyStatRecord};
use crate::stats::build_weekly_chart;
use tracing::{info, warn};

/// Last weekly payload and the chart derived from it.
#[derive(Debug, Default)]
pub struct StatsPanel {
    records: Vec<WeeklyStatRecord>,
    chart: WeeklyChart,
}

impl StatsPanel {
    pub fn chart(&self) -> &WeeklyChart {
        &self.chart
    }

    /// Re-pivots only when the payload changed. Returns `true` if it did.
    pub fn replace(&mut self, records: Vec<WeeklyStatRecord>) -> bool {
        if records == self.records {
            return false;
        }
        self.chart = build_weekly_chart(&records);
        self.records = records;
        true
    }
}

/// Handlers hold the console lock for a whole action, so requests never
/// interleave here. The edit epochs ([`EditController::begin_commit`]) and
/// refresh tickets ([`LinkDirectory::begin_refresh`]) are for callers that
/// release the lock while a request is in flight.
#[derive(Debug, Default)]
pub struct Console {
    directory: LinkDirectory,
    editor: EditController,
    form: CreationForm,
    stats: StatsPanel,
    notice: Option<Notice>,
}

impl Console {
    pub fn directory(&self) -> &LinkDirectory {
        &self.directory
    }

    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    pub fn form(&self) -> &CreationForm {
        &self.form
    }

    pub fn chart(&self) -> &WeeklyChart {
        self.stats.chart()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub async fn refresh_links(&mut self, service: &dyn LinkService) -> bool {
        let ticket = self.directory.begin_refresh();
        match service.list_links().await {
            Ok(links) => {
                if self.directory.complete_refresh(ticket, links) && self.editor.reconcile(&self.directory) {
                    info!("edited link disappeared from the service, edit cancelled");
                }
                true
            }
            Err(err) => {
                warn!("failed to fetch links: {err}");
                false
            }
        }
    }

    pub async fn refresh_stats(&mut self, service: &dyn LinkService) -> bool {
        match service.weekly_stats().await {
            Ok(records) => {
                self.stats.replace(records);
                true
            }
            Err(err) => {
                warn!("failed to fetch weekly stats: {err}");
                false
            }
        }
    }

    pub async fn create_link(
        &mut self,
        service: &dyn LinkService,
        long_url: &str,
        custom_short_code: &str,
    ) -> Result<Link, FormError> {
        self.form.set(long_url, custom_short_code);
        match self.form.submit(service).await {
            Ok(link) => {
                info!(short_code = %link.short_code, "link created");
                self.notice = Some(Notice::info(format!("Created {}", link.short_code)));
                self.directory.invalidate();
                self.refresh_links(service).await;
                Ok(link)
            }
            Err(err) if err.may_have_landed() => {
                // The service answered 2xx, so the link most likely exists.
                warn!("create succeeded but the response was unreadable: {err}");
                self.notice = Some(Notice::error(format!(
                    "Link may have been created, check the list: {err}"
                )));
                self.form.clear();
                self.directory.invalidate();
                self.refresh_links(service).await;
                Err(err)
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::Network => warn!("failed to create link: {err}"),
                    _ => info!("link rejected: {err}"),
                }
                self.notice = Some(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Enters edit mode on a link from the directory.
    ///
    /// Returns `false` if no such link is listed.
    pub fn start_edit(&mut self, short_code: &str) -> bool {
        match self.directory.find(short_code) {
            Some(link) => {
                self.editor.start_edit(link);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    pub async fn save_edit(&mut self, service: &dyn LinkService, draft: &str) -> Result<Link, EditError> {
        self.editor.update_draft(draft)?;
        match self.editor.commit(service).await {
            Ok(link) => {
                info!(short_code = %link.short_code, "link updated");
                self.notice = Some(Notice::info(format!("Updated {}", link.short_code)));
                self.directory.invalidate();
                self.refresh_links(service).await;
                Ok(link)
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::Network => warn!("failed to update link: {err}"),
                    _ => info!("update rejected: {err}"),
                }
                self.notice = Some(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            links: self.directory.links().to_vec(),
            stale: self.directory.is_stale(),
            editing: self.editor.session().map(|session| EditSnapshot {
                short_code: session.short_code.clone(),
                draft_long_url: session.draft_long_url.clone(),
            }),
            form: self.form.snapshot(),
            notice: self.notice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLinkService;
    use crate::edit::EditState;
    use crate::errors::ServiceError;
    use crate::models::NoticeKind;

    fn link(code: &str, url: &str) -> Link {
        Link {
            short_code: code.to_string(),
            long_url: url.to_string(),
        }
    }

    async fn console_with(links: Vec<Link>) -> Console {
        let mut service = MockLinkService::new();
        service
            .expect_list_links()
            .times(1)
            .returning(move || Ok(links.clone()));
        let mut console = Console::default();
        assert!(console.refresh_links(&service).await);
        console
    }

    #[tokio::test]
    async fn empty_service_renders_nothing_without_errors() {
        let mut service = MockLinkService::new();
        service.expect_list_links().returning(|| Ok(Vec::new()));
        service.expect_weekly_stats().returning(|| Ok(Vec::new()));

        let mut console = Console::default();
        assert!(console.refresh_links(&service).await);
        assert!(console.refresh_stats(&service).await);

        assert!(console.directory().links().is_empty());
        assert!(console.chart().rows.is_empty());
        assert!(console.notice().is_none());
    }

    #[tokio::test]
    async fn create_success_resets_form_and_refreshes_once() {
        let mut service = MockLinkService::new();
        service
            .expect_create_link()
            .times(1)
            .returning(|request| Ok(link("abc", &request.long_url)));
        service
            .expect_list_links()
            .times(1)
            .returning(|| Ok(vec![link("abc", "https://example.com/a")]));

        let mut console = Console::default();
        let created = console
            .create_link(&service, "https://example.com/a", "abc")
            .await
            .unwrap();

        assert_eq!(created.short_code, "abc");
        assert_eq!(console.form().long_url, "");
        assert_eq!(console.form().custom_short_code, "");
        assert_eq!(console.directory().links(), &[link("abc", "https://example.com/a")]);
        assert!(!console.directory().is_stale());
    }

    #[tokio::test]
    async fn create_failure_keeps_form_and_surfaces_detail() {
        let mut service = MockLinkService::new();
        service
            .expect_create_link()
            .times(1)
            .returning(|_| Err(ServiceError::AliasConflict("Short code already in use".into())));
        service.expect_list_links().never();

        let mut console = Console::default();
        assert!(console.create_link(&service, "https://example.com/a", "abc").await.is_err());

        assert_eq!(console.form().long_url, "https://example.com/a");
        assert_eq!(console.form().custom_short_code, "abc");
        let notice = console.take_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Short code already in use");
        assert!(console.notice().is_none());
    }

    #[tokio::test]
    async fn start_then_cancel_leaves_directory_untouched() {
        let mut console = console_with(vec![link("abc", "https://example.com/a")]).await;
        let before = console.directory().clone();

        assert!(console.start_edit("abc"));
        console.cancel_edit();

        assert_eq!(console.directory(), &before);
        assert_eq!(console.editor().state(), &EditState::Idle);
    }

    #[tokio::test]
    async fn start_edit_requires_listed_link() {
        let mut console = console_with(vec![link("abc", "https://example.com/a")]).await;
        assert!(!console.start_edit("zzz"));
        assert_eq!(console.editor().state(), &EditState::Idle);
    }

    #[tokio::test]
    async fn update_not_found_keeps_session_and_skips_refresh() {
        let mut console = console_with(vec![link("abc", "https://example.com/a")]).await;
        assert!(console.start_edit("abc"));

        let mut service = MockLinkService::new();
        service
            .expect_update_link()
            .times(1)
            .returning(|_, _| Err(ServiceError::NotFound("Short code not found".into())));
        service.expect_list_links().never();

        let err = console
            .save_edit(&service, "https://example.com/b")
            .await
            .unwrap_err();
        assert!(matches!(err, EditError::Service(ServiceError::NotFound(_))));

        let session = console.editor().session().unwrap();
        assert_eq!(session.short_code, "abc");
        assert_eq!(session.draft_long_url, "https://example.com/b");
        let notice = console.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Short code not found");
    }

    #[tokio::test]
    async fn unreadable_create_response_still_refreshes_and_clears_form() {
        let mut service = MockLinkService::new();
        service
            .expect_create_link()
            .times(1)
            .returning(|_| Err(ServiceError::Decode("expected value at line 1".into())));
        service
            .expect_list_links()
            .times(1)
            .returning(|| Ok(vec![link("abc", "https://example.com/a")]));

        let mut console = Console::default();
        assert!(console.create_link(&service, "https://example.com/a", "abc").await.is_err());

        assert_eq!(console.form(), &CreationForm::default());
        assert!(console.directory().contains("abc"));
        assert!(!console.directory().is_stale());
        assert_eq!(console.notice().map(|n| &n.kind), Some(&NoticeKind::Error));
    }

    #[tokio::test]
    async fn update_success_closes_session_and_refreshes() {
        let mut console = console_with(vec![link("abc", "https://example.com/a")]).await;
        assert!(console.start_edit("abc"));

        let mut service = MockLinkService::new();
        service
            .expect_update_link()
            .times(1)
            .returning(|code, url| Ok(link(code, url)));
        service
            .expect_list_links()
            .times(1)
            .returning(|| Ok(vec![link("abc", "https://example.com/b")]));

        console.save_edit(&service, "https://example.com/b").await.unwrap();

        assert_eq!(console.editor().state(), &EditState::Idle);
        assert_eq!(console.directory().links(), &[link("abc", "https://example.com/b")]);
    }

    #[tokio::test]
    async fn save_without_session_is_rejected_locally() {
        let mut service = MockLinkService::new();
        service.expect_update_link().never();

        let mut console = Console::default();
        let err = console.save_edit(&service, "https://example.com/b").await.unwrap_err();
        assert!(matches!(err, EditError::NoActiveSession));
        assert!(console.notice().is_none());
    }

    #[tokio::test]
    async fn failed_listing_keeps_previous_links_quietly() {
        let mut console = console_with(vec![link("abc", "https://example.com/a")]).await;

        let mut service = MockLinkService::new();
        service
            .expect_list_links()
            .times(1)
            .returning(|| Err(ServiceError::Unavailable("connection refused".into())));
        service
            .expect_weekly_stats()
            .times(1)
            .returning(|| Err(ServiceError::Unavailable("connection refused".into())));

        assert!(!console.refresh_links(&service).await);
        assert!(!console.refresh_stats(&service).await);
        assert_eq!(console.directory().links(), &[link("abc", "https://example.com/a")]);
        assert!(console.notice().is_none());
    }

    #[tokio::test]
    async fn refresh_cancels_edit_of_vanished_link() {
        let mut console = console_with(vec![link("abc", "https://example.com/a")]).await;
        assert!(console.start_edit("abc"));

        let mut service = MockLinkService::new();
        service.expect_list_links().times(1).returning(|| Ok(Vec::new()));
        console.refresh_links(&service).await;

        assert_eq!(console.editor().state(), &EditState::Idle);
    }

    #[test]
    fn stats_panel_repivots_only_on_change() {
        let records = vec![WeeklyStatRecord {
            short_code: "abc".to_string(),
            weekly_data: [("2026-10-12".to_string(), 4)].into_iter().collect(),
        }];

        let mut panel = StatsPanel::default();
        assert!(!panel.replace(Vec::new()));
        assert!(panel.replace(records.clone()));
        assert!(!panel.replace(records));
        assert_eq!(panel.chart().total, 4);
    }
}
