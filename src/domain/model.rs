use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub type ReportId = String;

pub const REQUIRED_COLUMNS: [&str; 3] = ["date", "revenue", "expense"];

/// Columns the engine reads when present. Absence of the whole column, not of
/// individual cells, decides which defaults apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionalColumn {
    ExpenseCategory,
    EntryType,
    Amount,
    InventoryClosing,
    LoanAmount,
    EmiAmount,
    GstCollected,
    GstPaid,
    Industry,
}

impl OptionalColumn {
    pub const ALL: [OptionalColumn; 9] = [
        OptionalColumn::ExpenseCategory,
        OptionalColumn::EntryType,
        OptionalColumn::Amount,
        OptionalColumn::InventoryClosing,
        OptionalColumn::LoanAmount,
        OptionalColumn::EmiAmount,
        OptionalColumn::GstCollected,
        OptionalColumn::GstPaid,
        OptionalColumn::Industry,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            OptionalColumn::ExpenseCategory => "expense_category",
            OptionalColumn::EntryType => "type",
            OptionalColumn::Amount => "amount",
            OptionalColumn::InventoryClosing => "inventory_closing",
            OptionalColumn::LoanAmount => "loan_amount",
            OptionalColumn::EmiAmount => "emi_amount",
            OptionalColumn::GstCollected => "gst_collected",
            OptionalColumn::GstPaid => "gst_paid",
            OptionalColumn::Industry => "industry",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.header() == header)
    }
}

/// One CSV row. Optional cells are `None` when the column is absent or the
/// cell is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub revenue: f64,
    pub expense: f64,
    #[serde(default)]
    pub expense_category: Option<String>,
    #[serde(default, rename = "type")]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub inventory_closing: Option<f64>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub emi_amount: Option<f64>,
    #[serde(default)]
    pub gst_collected: Option<f64>,
    #[serde(default)]
    pub gst_paid: Option<f64>,
    #[serde(default)]
    pub industry: Option<String>,
}

impl Transaction {
    pub fn new(date: impl Into<String>, revenue: f64, expense: f64) -> Self {
        Self {
            date: date.into(),
            revenue,
            expense,
            ..Default::default()
        }
    }

    pub fn cashflow(&self) -> f64 {
        self.revenue - self.expense
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    rows: Vec<Transaction>,
    columns: BTreeSet<OptionalColumn>,
}

impl TransactionTable {
    pub fn new(
        rows: Vec<Transaction>,
        columns: impl IntoIterator<Item = OptionalColumn>,
    ) -> Self {
        Self {
            rows,
            columns: columns.into_iter().collect(),
        }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has(&self, column: OptionalColumn) -> bool {
        self.columns.contains(&column)
    }

    pub fn columns(&self) -> impl Iterator<Item = OptionalColumn> + '_ {
        self.columns.iter().copied()
    }

    /// Sum of an optional numeric column; empty cells are skipped.
    pub fn sum_of(&self, column: OptionalColumn, cell: impl Fn(&Transaction) -> Option<f64>) -> f64 {
        if !self.has(column) {
            return 0.0;
        }
        self.rows.iter().filter_map(cell).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Benchmark {
    #[serde(rename = "Above industry average")]
    Above,
    #[serde(rename = "Below industry average")]
    Below,
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Benchmark::Above => f.write_str("Above industry average"),
            Benchmark::Below => f.write_str("Below industry average"),
        }
    }
}

/// Output of the metrics engine. Field order matches the JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    pub margin: f64,
    pub health_score: u8,
    pub credit_score: u8,
    pub risk_level: RiskLevel,
    pub forecast: f64,
    pub benchmark: Benchmark,
    pub industry: String,
    pub expense_categories: BTreeMap<String, f64>,
    pub suggestions: Vec<String>,
    pub receivable: f64,
    pub payable: f64,
    pub inventory: f64,
    pub loan_total: f64,
    pub gst_collected: f64,
    pub gst_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub revenue: f64,
    pub expense: f64,
}

impl From<&Transaction> for ChartPoint {
    fn from(row: &Transaction) -> Self {
        Self {
            date: row.date.clone(),
            revenue: row.revenue,
            expense: row.expense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSource {
    Ai,
    RuleBased,
}

impl fmt::Display for InsightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightSource::Ai => f.write_str("ai"),
            InsightSource::RuleBased => f.write_str("rule_based"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: ReportId,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: Metrics,
    pub chart_data: Vec<ChartPoint>,
    pub risks: Vec<String>,
    pub ai_insights: String,
    pub insight_source: InsightSource,
}

/// Why the narrative collaborator produced no text. Every variant leads to the
/// rule-based narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No API key configured, or insights switched off.
    Disabled,
    /// The request never produced an HTTP response (DNS, TLS, timeout).
    Transport(String),
    /// The provider answered with a non-success status.
    Status(u16),
    /// The body was not the expected JSON shape.
    Malformed(String),
    /// The provider answered but returned no usable text.
    Empty,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Disabled => f.write_str("insights disabled"),
            FallbackReason::Transport(msg) => write!(f, "transport error: {}", msg),
            FallbackReason::Status(code) => write!(f, "provider returned status {}", code),
            FallbackReason::Malformed(msg) => write!(f, "malformed response: {}", msg),
            FallbackReason::Empty => f.write_str("empty response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightOutcome {
    Generated(String),
    Unavailable(FallbackReason),
}
