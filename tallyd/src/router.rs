//! Command router.
//!
//! Maps recognized text commands onto ledger operations and renders
//! the replies. Every failure is caught at this boundary and turned
//! into a plain reply; nothing a user types may take the process down.
//! Unrecognized text is ignored entirely.

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use tracing::error;

use tally_domain::{format_amount, format_date, ActorId, DomainError, EndpointId, RecordField};
use tally_engine::{window, EngineError, Ledger, Listing, Statistics, WindowReport};
use tally_notify::{MessengerPort, Notifier, SubscriberRegistry};
use tally_store::TablePort;

// =============================================================================
// Commands
// =============================================================================

/// A recognized text command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the reference and register the endpoint
    Start,
    /// Show the reference
    Help,
    /// Record a new entry
    Add {
        /// Application name
        application: String,
        /// Plan type
        plan_type: String,
        /// Unparsed profit text
        raw_profit: String,
    },
    /// `add` was recognized but the arguments are unusable
    AddUsage,
    /// Today's transactions
    Today,
    /// Yesterday's transactions
    Yesterday,
    /// This ISO week's transactions (Monday through Sunday)
    Week,
    /// This calendar month's transactions
    Month,
    /// All transactions
    List,
    /// Per-application summary
    Summary,
    /// Top five applications by total
    Top,
    /// Full statistics
    Stats,
    /// Change one field of an entry
    Edit {
        /// Target sequence number
        seq: u32,
        /// Unvalidated field token
        field: String,
        /// Unparsed new value
        value: String,
    },
    /// Remove an entry and renumber
    Delete {
        /// Target sequence number
        seq: u32,
    },
    /// Remove the actor's most recent add
    Undo,
}

impl Command {
    /// Parse a message into a command.
    ///
    /// A leading `/` is optional. Returns `None` for anything that is
    /// not a recognized command shape; the bot stays silent on those.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        let text = text.strip_prefix('/').unwrap_or(text);

        let (keyword, rest) = match text.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (text, ""),
        };

        match keyword {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "add" if !rest.is_empty() => Some(Self::parse_add(rest)),
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "list" => Some(Self::List),
            "summary" => Some(Self::Summary),
            "top" => Some(Self::Top),
            "stats" => Some(Self::Stats),
            "edit" => Self::parse_edit(rest),
            "delete" => {
                let seq = rest.split_whitespace().next()?.parse::<u32>().ok()?;
                Some(Self::Delete { seq })
            }
            "undo" => Some(Self::Undo),
            _ => None,
        }
    }

    fn parse_add(rest: &str) -> Command {
        let parts: Vec<&str> = rest
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() < 3 {
            return Command::AddUsage;
        }

        Command::Add {
            application: parts[0].to_string(),
            plan_type: parts[1].to_string(),
            raw_profit: parts[2].to_string(),
        }
    }

    fn parse_edit(rest: &str) -> Option<Command> {
        let (seq_token, rest) = rest.split_once(char::is_whitespace)?;
        let seq = seq_token.parse::<u32>().ok()?;

        let (field, value) = rest.trim().split_once(char::is_whitespace)?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        Some(Command::Edit {
            seq,
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

// =============================================================================
// Router
// =============================================================================

/// Dispatches commands to the engine and formats replies.
pub struct Router<T: TablePort, M: MessengerPort> {
    ledger: Arc<Ledger<T>>,
    registry: Arc<SubscriberRegistry>,
    notifier: Arc<Notifier<M>>,
}

impl<T: TablePort, M: MessengerPort> Router<T, M> {
    /// Create a router over the engine, roster, and notifier
    pub fn new(
        ledger: Arc<Ledger<T>>,
        registry: Arc<SubscriberRegistry>,
        notifier: Arc<Notifier<M>>,
    ) -> Self {
        Self {
            ledger,
            registry,
            notifier,
        }
    }

    /// Handle one message. Returns the reply text, or `None` when the
    /// message is not a recognized command.
    pub async fn dispatch(
        &self,
        actor: ActorId,
        endpoint: EndpointId,
        actor_name: &str,
        text: &str,
    ) -> Option<String> {
        let command = Command::parse(text)?;
        Some(self.execute(command, actor, endpoint, actor_name).await)
    }

    async fn execute(
        &self,
        command: Command,
        actor: ActorId,
        endpoint: EndpointId,
        actor_name: &str,
    ) -> String {
        match command {
            Command::Start => {
                self.registry.register(endpoint);
                HELP_TEXT.to_string()
            }
            Command::Help => HELP_TEXT.to_string(),
            Command::AddUsage => ADD_USAGE.to_string(),
            Command::Add {
                application,
                plan_type,
                raw_profit,
            } => {
                self.registry.register(endpoint);
                self.handle_add(actor, endpoint, actor_name, &application, &plan_type, &raw_profit)
                    .await
            }
            Command::Today => {
                let today = Local::now().date_naive();
                self.handle_day(today, "hari ini", "Hari ini").await
            }
            Command::Yesterday => {
                let today = Local::now().date_naive();
                let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
                self.handle_day(yesterday, "kemarin", "Kemarin").await
            }
            Command::Week => {
                let (start, end) = window::week_range(Local::now().date_naive());
                self.handle_window(start, end, "minggu ini", "Minggu ini").await
            }
            Command::Month => {
                let (start, end) = window::month_range(Local::now().date_naive());
                self.handle_window(start, end, "bulan ini", "Bulan ini").await
            }
            Command::List => self.handle_list().await,
            Command::Summary => self.handle_summary().await,
            Command::Top => self.handle_top().await,
            Command::Stats => self.handle_stats().await,
            Command::Edit { seq, field, value } => self.handle_edit(seq, &field, &value).await,
            Command::Delete { seq } => self.handle_delete(seq).await,
            Command::Undo => self.handle_undo(actor).await,
        }
    }

    fn sheet(&self) -> &str {
        self.ledger.sheet_name()
    }

    async fn handle_add(
        &self,
        actor: ActorId,
        endpoint: EndpointId,
        actor_name: &str,
        application: &str,
        plan_type: &str,
        raw_profit: &str,
    ) -> String {
        match self.ledger.add(actor, application, plan_type, raw_profit).await {
            Ok(record) => {
                self.notifier.announce_add(endpoint, actor_name, &record).await;
                format!(
                    "✅ Tercatat ({}) #{}\n{}\n{} | {} | {}",
                    self.sheet(),
                    record.seq,
                    format_date(record.date),
                    record.application,
                    record.plan_type,
                    record.profit
                )
            }
            Err(EngineError::Validation(e)) => validation_reply(&e),
            Err(e) => failure("menambahkan data", &e),
        }
    }

    async fn handle_day(&self, date: NaiveDate, lower: &str, upper: &str) -> String {
        match self.ledger.list_by_date(date).await {
            Ok(listing) if listing.is_empty() => format!(
                "Belum ada transaksi {} ({}) di tab {}.",
                lower,
                format_date(date),
                self.sheet()
            ),
            Ok(listing) => format!(
                "📌 {} ({}) [{}]\n{}\n\nTotal: {}",
                upper,
                format_date(date),
                self.sheet(),
                summary_lines(&listing),
                format_amount(listing.total)
            ),
            Err(e) => failure("mengambil data", &e),
        }
    }

    async fn handle_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        lower: &str,
        upper: &str,
    ) -> String {
        match self.ledger.list_window(start, end).await {
            Ok(report) if report.is_empty() => format!(
                "Belum ada transaksi {} ({} - {}) di tab {}.",
                lower,
                format_date(start),
                format_date(end),
                self.sheet()
            ),
            Ok(report) => format_window(&report, start, end, upper, self.sheet()),
            Err(e) => failure("mengambil data", &e),
        }
    }

    async fn handle_list(&self) -> String {
        match self.ledger.list_all().await {
            Ok(listing) if listing.is_empty() => {
                format!("Belum ada transaksi di tab {}.", self.sheet())
            }
            Ok(listing) => {
                let lines: Vec<String> =
                    listing.records.iter().map(|r| r.detail_line()).collect();
                format!(
                    "📋 Semua Transaksi [{}]\n{}\n\nTotal: {}",
                    self.sheet(),
                    lines.join("\n"),
                    format_amount(listing.total)
                )
            }
            Err(e) => failure("mengambil data", &e),
        }
    }

    async fn handle_summary(&self) -> String {
        match self.ledger.summary_by_application().await {
            Ok(summary) if summary.apps.is_empty() => {
                format!("Belum ada transaksi di tab {}.", self.sheet())
            }
            Ok(summary) => {
                let blocks: Vec<String> = summary
                    .apps
                    .iter()
                    .map(|app| {
                        format!(
                            "{}: {}x transaksi\nTotal: {}",
                            app.application,
                            app.count,
                            format_amount(app.total)
                        )
                    })
                    .collect();
                format!(
                    "📊 Ringkasan per Aplikasi [{}]\n\n{}\n\n━━━━━━━━━━━━━━━\nGrand Total: {}",
                    self.sheet(),
                    blocks.join("\n\n"),
                    format_amount(summary.grand_total)
                )
            }
            Err(e) => failure("mengambil data", &e),
        }
    }

    async fn handle_top(&self) -> String {
        match self.ledger.top_applications(5).await {
            Ok(apps) if apps.is_empty() => {
                format!("Belum ada transaksi di tab {}.", self.sheet())
            }
            Ok(apps) => {
                let lines: Vec<String> = apps
                    .iter()
                    .enumerate()
                    .map(|(i, app)| {
                        format!(
                            "{}. {}: {}x, {}",
                            i + 1,
                            app.application,
                            app.count,
                            format_amount(app.total)
                        )
                    })
                    .collect();
                format!("🏆 Top 5 Aplikasi [{}]\n{}", self.sheet(), lines.join("\n"))
            }
            Err(e) => failure("mengambil data", &e),
        }
    }

    async fn handle_stats(&self) -> String {
        match self.ledger.statistics().await {
            Ok(None) => format!("Belum ada transaksi di tab {}.", self.sheet()),
            Ok(Some(stats)) => format_stats(&stats, self.sheet()),
            Err(e) => failure("mengambil data", &e),
        }
    }

    async fn handle_edit(&self, seq: u32, field: &str, value: &str) -> String {
        let field = match RecordField::parse(field) {
            Ok(field) => field,
            Err(_) => return EDIT_FIELD_USAGE.to_string(),
        };

        match self.ledger.edit(seq, field, value).await {
            Ok(outcome) => format!(
                "✏️ Berhasil edit entry #{}\n\nField: {}\nDari: {}\nJadi: {}",
                outcome.seq, outcome.field, outcome.old, outcome.new
            ),
            Err(EngineError::NotFound { seq }) => {
                format!("❌ Entry #{} tidak ditemukan.", seq)
            }
            Err(EngineError::Validation(e)) => validation_reply(&e),
            Err(e) => failure("mengedit data", &e),
        }
    }

    async fn handle_delete(&self, seq: u32) -> String {
        match self.ledger.delete(seq).await {
            Ok(outcome) => format!(
                "🗑️ Berhasil dihapus #{}\n{} | {} | {}\n\nSisa {} entry (sudah di-renumber)",
                seq,
                outcome.removed.application,
                outcome.removed.plan_type,
                outcome.removed.profit,
                outcome.remaining
            ),
            Err(EngineError::NotFound { seq }) => {
                format!("❌ Entry #{} tidak ditemukan.", seq)
            }
            Err(e) => failure("menghapus data", &e),
        }
    }

    async fn handle_undo(&self, actor: ActorId) -> String {
        match self.ledger.undo(actor).await {
            Ok(_removed) => format!(
                "↩️ Undo sukses: hapus 1 entry terakhir di tab {}.",
                self.sheet()
            ),
            Err(EngineError::NothingToUndo) => "Tidak ada entry yang bisa di-undo.".to_string(),
            Err(EngineError::UndoTargetChanged) => {
                "Entry terakhir sudah berubah, undo dibatalkan.".to_string()
            }
            Err(e) => failure("undo", &e),
        }
    }
}

// =============================================================================
// Reply texts
// =============================================================================

const HELP_TEXT: &str = "Perintah:
/add Aplikasi | Jenis | Laba
/today - Transaksi hari ini
/yesterday - Transaksi kemarin
/week - Transaksi minggu ini
/month - Transaksi bulan ini
/list - Semua transaksi
/summary - Ringkasan per aplikasi
/top - 5 aplikasi teratas
/stats - Statistik lengkap
/edit <nomor> <field> <value>
/undo
/delete <nomor>
/help - Tampilkan bantuan

Contoh:
/add Capcut | 1 bulan | 8000
/edit 3 laba 10000
/delete 3";

const ADD_USAGE: &str =
    "Format salah.\nPakai:\n/add Aplikasi | Jenis | Laba\nContoh: /add Canva | lifetime | 15000";

const EDIT_FIELD_USAGE: &str = "❌ Field tidak valid. Gunakan: aplikasi, jenis, atau laba\n\nContoh:\n/edit 3 aplikasi Canva\n/edit 3 jenis lifetime\n/edit 3 laba 10000";

const AMOUNT_INVALID: &str = "❌ Nilai laba tidak valid. Gunakan angka positif.";

fn validation_reply(error: &DomainError) -> String {
    match error {
        DomainError::UnparseableAmount(_) | DomainError::NonPositiveAmount(_) => {
            AMOUNT_INVALID.to_string()
        }
        _ => ADD_USAGE.to_string(),
    }
}

fn failure(what: &str, error: &EngineError) -> String {
    error!(error = %error, "Command failed");
    // Store-level messages (missing sheet in particular) go out verbatim
    let detail = match error {
        EngineError::Store(e) => e.to_string(),
        other => other.to_string(),
    };
    format!("❌ Gagal {}. Error: {}", what, detail)
}

fn summary_lines(listing: &Listing) -> String {
    let lines: Vec<String> = listing.records.iter().map(|r| r.summary_line()).collect();
    lines.join("\n")
}

fn format_window(
    report: &WindowReport,
    start: NaiveDate,
    end: NaiveDate,
    upper: &str,
    sheet: &str,
) -> String {
    let lines: Vec<String> = report.records.iter().map(|r| r.summary_line()).collect();
    let day_lines: Vec<String> = report
        .days
        .iter()
        .map(|day| {
            format!(
                "{}: {}x, {}",
                format_date(day.date),
                day.count,
                format_amount(day.total)
            )
        })
        .collect();

    format!(
        "📅 {} ({} - {}) [{}]\n{}\n\nPer hari:\n{}\n\nTotal: {}\nRata-rata/hari aktif: {}",
        upper,
        format_date(start),
        format_date(end),
        sheet,
        lines.join("\n"),
        day_lines.join("\n"),
        format_amount(report.total),
        format_amount(report.average_per_active_day)
    )
}

fn format_stats(stats: &Statistics, sheet: &str) -> String {
    format!(
        "📈 Statistik [{}]\nTransaksi: {}\nTotal: {}\nHari aktif: {}\nRata-rata/transaksi: {}\nRata-rata/hari aktif: {}\nTerbesar: {}\nTerkecil: {}\nAplikasi tersering: {} ({}x, {})\nJenis tersering: {} ({}x, {})\nHari terbaik: {} ({}x, {})",
        sheet,
        stats.count,
        format_amount(stats.total),
        stats.active_days,
        format_amount(stats.average_per_transaction),
        format_amount(stats.average_per_active_day),
        stats.max_record.summary_line(),
        stats.min_record.summary_line(),
        stats.busiest_application.application,
        stats.busiest_application.count,
        format_amount(stats.busiest_application.total),
        stats.busiest_plan_type.plan_type,
        stats.busiest_plan_type.count,
        format_amount(stats.busiest_plan_type.total),
        format_date(stats.best_day.date),
        stats.best_day.count,
        format_amount(stats.best_day.total)
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tally_engine::UndoStore;
    use tally_notify::StubMessenger;
    use tally_store::MemoryTable;
    use tempfile::TempDir;

    struct TestBed {
        router: Router<MemoryTable, StubMessenger>,
        registry: Arc<SubscriberRegistry>,
        messenger: Arc<StubMessenger>,
        _dir: TempDir,
    }

    fn create_test_router() -> TestBed {
        let dir = tempfile::tempdir().unwrap();
        let table = Arc::new(MemoryTable::new("SEED"));
        let ledger = Arc::new(Ledger::new(table, Arc::new(UndoStore::new())));
        let registry = Arc::new(SubscriberRegistry::load(dir.path().join("roster.json")));
        let messenger = Arc::new(StubMessenger::new());
        let notifier = Arc::new(Notifier::new(Arc::clone(&registry), Arc::clone(&messenger)));

        TestBed {
            router: Router::new(ledger, Arc::clone(&registry), notifier),
            registry,
            messenger,
            _dir: dir,
        }
    }

    async fn send(bed: &TestBed, chat: i64, text: &str) -> Option<String> {
        bed.router
            .dispatch(ActorId(chat), EndpointId(chat), "Budi", text)
            .await
    }

    // Command parsing

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("help"), Some(Command::Help));
        assert_eq!(Command::parse("/today"), Some(Command::Today));
        assert_eq!(Command::parse("/yesterday"), Some(Command::Yesterday));
        assert_eq!(Command::parse("week"), Some(Command::Week));
        assert_eq!(Command::parse("month"), Some(Command::Month));
        assert_eq!(Command::parse("/list"), Some(Command::List));
        assert_eq!(Command::parse("/summary"), Some(Command::Summary));
        assert_eq!(Command::parse("/top"), Some(Command::Top));
        assert_eq!(Command::parse("/stats"), Some(Command::Stats));
        assert_eq!(Command::parse("/undo"), Some(Command::Undo));
    }

    #[test]
    fn test_parse_is_case_sensitive_and_ignores_noise() {
        assert_eq!(Command::parse("/Start"), None);
        assert_eq!(Command::parse("LIST"), None);
        assert_eq!(Command::parse("halo semuanya"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            Command::parse("/add Canva | lifetime | 15000"),
            Some(Command::Add {
                application: "Canva".to_string(),
                plan_type: "lifetime".to_string(),
                raw_profit: "15000".to_string(),
            })
        );
        assert_eq!(Command::parse("/add Canva | lifetime"), Some(Command::AddUsage));
        assert_eq!(Command::parse("/add | | "), Some(Command::AddUsage));
        assert_eq!(Command::parse("/add"), None, "bare add is ignored");
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(
            Command::parse("/edit 3 laba 10000"),
            Some(Command::Edit {
                seq: 3,
                field: "laba".to_string(),
                value: "10000".to_string(),
            })
        );
        assert_eq!(
            Command::parse("/edit 2 jenis 3 bulan"),
            Some(Command::Edit {
                seq: 2,
                field: "jenis".to_string(),
                value: "3 bulan".to_string(),
            })
        );
        assert_eq!(Command::parse("/edit tiga laba 10000"), None);
        assert_eq!(Command::parse("/edit 3 laba"), None);
        assert_eq!(Command::parse("/edit"), None);
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(Command::parse("/delete 3"), Some(Command::Delete { seq: 3 }));
        assert_eq!(Command::parse("/delete tiga"), None);
        assert_eq!(Command::parse("/delete"), None);
    }

    // Dispatch

    #[tokio::test]
    async fn test_unrecognized_text_is_ignored() {
        let bed = create_test_router();
        assert_eq!(send(&bed, 1, "mantap bang").await, None);
    }

    #[tokio::test]
    async fn test_start_registers_and_shows_help() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/start").await.unwrap();
        assert!(reply.contains("/add Aplikasi | Jenis | Laba"));
        assert!(bed.registry.contains(EndpointId(1)));
    }

    #[tokio::test]
    async fn test_help_does_not_register() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/help").await.unwrap();
        assert!(reply.contains("Perintah:"));
        assert!(!bed.registry.contains(EndpointId(1)));
    }

    #[tokio::test]
    async fn test_add_confirms_and_registers() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();
        assert!(reply.starts_with("✅ Tercatat (SEED) #1"));
        assert!(reply.contains("Canva | lifetime | Rp 15.000"));
        assert!(bed.registry.contains(EndpointId(1)));
    }

    #[tokio::test]
    async fn test_add_broadcasts_to_other_subscribers_only() {
        let bed = create_test_router();

        send(&bed, 2, "/start").await.unwrap();
        send(&bed, 3, "/start").await.unwrap();
        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();

        let recipients = bed.messenger.recipients();
        assert_eq!(recipients, vec![EndpointId(2), EndpointId(3)]);

        let text = &bed.messenger.sent()[0].1;
        assert!(text.contains("Budi"));
        assert!(text.contains("#1"));
        assert!(text.contains("Canva | lifetime | Rp 15.000"));
    }

    #[tokio::test]
    async fn test_add_broadcast_failure_evicts_and_spares_sender() {
        let bed = create_test_router();

        send(&bed, 2, "/start").await.unwrap();
        send(&bed, 3, "/start").await.unwrap();
        bed.messenger.fail_endpoint(EndpointId(3));

        let reply = send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();
        assert!(reply.starts_with("✅"), "sender still sees success");
        assert!(!bed.registry.contains(EndpointId(3)));

        // Next add reaches only endpoint 2
        send(&bed, 1, "/add Capcut | 1 bulan | 8000").await.unwrap();
        let recipients = bed.messenger.recipients();
        assert_eq!(recipients, vec![EndpointId(2), EndpointId(2)]);
    }

    #[tokio::test]
    async fn test_add_usage_reply() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/add Canva | lifetime").await.unwrap();
        assert!(reply.starts_with("Format salah."));
    }

    #[tokio::test]
    async fn test_add_invalid_amount_reply() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/add Canva | lifetime | murah").await.unwrap();
        assert_eq!(reply, AMOUNT_INVALID);

        let reply = send(&bed, 1, "/add Canva | lifetime | -5000").await.unwrap();
        assert_eq!(reply, AMOUNT_INVALID);
    }

    #[tokio::test]
    async fn test_today_empty_and_filled() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/today").await.unwrap();
        assert!(reply.starts_with("Belum ada transaksi hari ini"));
        assert!(reply.contains("di tab SEED."));

        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();

        let reply = send(&bed, 1, "/today").await.unwrap();
        assert!(reply.starts_with("📌 Hari ini"));
        assert!(reply.contains("#1 Canva | lifetime | Rp 15.000"));
        assert!(reply.contains("Total: Rp 15.000"));
    }

    #[tokio::test]
    async fn test_yesterday_empty() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/yesterday").await.unwrap();
        assert!(reply.starts_with("Belum ada transaksi kemarin"));
    }

    #[tokio::test]
    async fn test_week_includes_today_and_day_breakdown() {
        let bed = create_test_router();

        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();
        send(&bed, 1, "/add Capcut | 1 bulan | 8000").await.unwrap();

        let reply = send(&bed, 1, "/week").await.unwrap();
        assert!(reply.starts_with("📅 Minggu ini"));
        assert!(reply.contains("Per hari:"));
        assert!(reply.contains("2x, Rp 23.000"));
        assert!(reply.contains("Total: Rp 23.000"));
        assert!(reply.contains("Rata-rata/hari aktif: Rp 23.000"));
    }

    #[tokio::test]
    async fn test_month_includes_today() {
        let bed = create_test_router();

        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();

        let reply = send(&bed, 1, "/month").await.unwrap();
        assert!(reply.starts_with("📅 Bulan ini"));
        assert!(reply.contains("Total: Rp 15.000"));
    }

    #[tokio::test]
    async fn test_list_empty_and_filled() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/list").await.unwrap();
        assert_eq!(reply, "Belum ada transaksi di tab SEED.");

        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();
        send(&bed, 1, "/add Capcut | 1 bulan | 8000").await.unwrap();

        let reply = send(&bed, 1, "/list").await.unwrap();
        assert!(reply.starts_with("📋 Semua Transaksi [SEED]"));
        assert!(reply.contains("#1"));
        assert!(reply.contains("#2"));
        assert!(reply.contains("Total: Rp 23.000"));
    }

    #[tokio::test]
    async fn test_summary_reply() {
        let bed = create_test_router();

        send(&bed, 1, "/add App A | x | 1000").await.unwrap();
        send(&bed, 1, "/add App B | x | 2000").await.unwrap();
        send(&bed, 1, "/add App A | x | 500").await.unwrap();

        let reply = send(&bed, 1, "/summary").await.unwrap();
        assert!(reply.starts_with("📊 Ringkasan per Aplikasi [SEED]"));
        assert!(reply.contains("App B: 1x transaksi\nTotal: Rp 2.000"));
        assert!(reply.contains("App A: 2x transaksi\nTotal: Rp 1.500"));
        assert!(reply.contains("Grand Total: Rp 3.500"));

        let b_pos = reply.find("App B").unwrap();
        let a_pos = reply.find("App A").unwrap();
        assert!(b_pos < a_pos, "sorted by total descending");
    }

    #[tokio::test]
    async fn test_top_reply() {
        let bed = create_test_router();

        for (app, amount) in [("A", "100"), ("B", "600"), ("C", "200"), ("D", "300"), ("E", "400"), ("F", "500")] {
            send(&bed, 1, &format!("/add {} | x | {}", app, amount)).await.unwrap();
        }

        let reply = send(&bed, 1, "/top").await.unwrap();
        assert!(reply.starts_with("🏆 Top 5 Aplikasi [SEED]"));
        assert!(reply.contains("1. B: 1x, Rp 600"));
        assert!(!reply.contains("A: 1x, Rp 100"), "sixth app is cut off");
    }

    #[tokio::test]
    async fn test_stats_reply() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/stats").await.unwrap();
        assert_eq!(reply, "Belum ada transaksi di tab SEED.");

        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();
        send(&bed, 1, "/add Capcut | 1 bulan | 5000").await.unwrap();

        let reply = send(&bed, 1, "/stats").await.unwrap();
        assert!(reply.starts_with("📈 Statistik [SEED]"));
        assert!(reply.contains("Transaksi: 2"));
        assert!(reply.contains("Total: Rp 20.000"));
        assert!(reply.contains("Terbesar: #1 Canva | lifetime | Rp 15.000"));
        assert!(reply.contains("Terkecil: #2 Capcut | 1 bulan | Rp 5.000"));
    }

    #[tokio::test]
    async fn test_edit_replies() {
        let bed = create_test_router();
        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();

        let reply = send(&bed, 1, "/edit 1 laba 20000").await.unwrap();
        assert!(reply.contains("✏️ Berhasil edit entry #1"));
        assert!(reply.contains("Dari: Rp 15.000"));
        assert!(reply.contains("Jadi: Rp 20.000"));

        let reply = send(&bed, 1, "/edit 1 tanggal 01/01/2024").await.unwrap();
        assert!(reply.starts_with("❌ Field tidak valid."));

        let reply = send(&bed, 1, "/edit 9 laba 20000").await.unwrap();
        assert_eq!(reply, "❌ Entry #9 tidak ditemukan.");

        let reply = send(&bed, 1, "/edit 1 laba nol").await.unwrap();
        assert_eq!(reply, AMOUNT_INVALID);
    }

    #[tokio::test]
    async fn test_delete_replies() {
        let bed = create_test_router();
        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();
        send(&bed, 1, "/add Capcut | 1 bulan | 8000").await.unwrap();

        let reply = send(&bed, 1, "/delete 1").await.unwrap();
        assert!(reply.starts_with("🗑️ Berhasil dihapus #1"));
        assert!(reply.contains("Canva | lifetime | Rp 15.000"));
        assert!(reply.contains("Sisa 1 entry (sudah di-renumber)"));

        let reply = send(&bed, 1, "/delete 9").await.unwrap();
        assert_eq!(reply, "❌ Entry #9 tidak ditemukan.");
    }

    #[tokio::test]
    async fn test_undo_replies() {
        let bed = create_test_router();

        let reply = send(&bed, 1, "/undo").await.unwrap();
        assert_eq!(reply, "Tidak ada entry yang bisa di-undo.");

        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();
        let reply = send(&bed, 1, "/undo").await.unwrap();
        assert_eq!(reply, "↩️ Undo sukses: hapus 1 entry terakhir di tab SEED.");

        let reply = send(&bed, 1, "/list").await.unwrap();
        assert_eq!(reply, "Belum ada transaksi di tab SEED.");
    }

    #[tokio::test]
    async fn test_undo_stale_target_reply() {
        let bed = create_test_router();

        send(&bed, 1, "/add App A | x | 1000").await.unwrap();
        send(&bed, 1, "/add App B | x | 2000").await.unwrap();
        send(&bed, 2, "/delete 2").await.unwrap();

        let reply = send(&bed, 1, "/undo").await.unwrap();
        assert_eq!(reply, "Entry terakhir sudah berubah, undo dibatalkan.");
    }

    #[tokio::test]
    async fn test_store_failure_becomes_plain_reply() {
        let bed = create_test_router();
        send(&bed, 1, "/add Canva | lifetime | 15000").await.unwrap();

        // Reach the private table through the ledger is not possible
        // here, so exercise the error path with a fresh bed whose
        // table rejects the next call.
        let dir = tempfile::tempdir().unwrap();
        let table = Arc::new(MemoryTable::new("SEED"));
        table.set_fail_next(true);
        let ledger = Arc::new(Ledger::new(Arc::clone(&table), Arc::new(UndoStore::new())));
        let registry = Arc::new(SubscriberRegistry::load(dir.path().join("roster.json")));
        let messenger = Arc::new(StubMessenger::new());
        let notifier = Arc::new(Notifier::new(Arc::clone(&registry), messenger));
        let router = Router::new(ledger, registry, notifier);

        let reply = router
            .dispatch(ActorId(1), EndpointId(1), "Budi", "/list")
            .await
            .unwrap();
        assert!(reply.starts_with("❌ Gagal mengambil data. Error:"));
    }

    #[tokio::test]
    async fn test_missing_sheet_reported_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let table = Arc::new(MemoryTable::missing("Maret24"));
        let ledger = Arc::new(Ledger::new(table, Arc::new(UndoStore::new())));
        let registry = Arc::new(SubscriberRegistry::load(dir.path().join("roster.json")));
        let messenger = Arc::new(StubMessenger::new());
        let notifier = Arc::new(Notifier::new(Arc::clone(&registry), messenger));
        let router = Router::new(ledger, registry, notifier);

        let reply = router
            .dispatch(ActorId(1), EndpointId(1), "Budi", "/add Canva | lifetime | 15000")
            .await
            .unwrap();
        assert_eq!(
            reply,
            "❌ Gagal menambahkan data. Error: Sheet tidak ditemukan: Maret24"
        );
    }
}
