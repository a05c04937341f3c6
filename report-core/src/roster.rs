//! Roster dataset: providers, search filters, table columns and chart buckets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ReportError, ReportResult};

/// Sites a provider can be credentialed at.
pub const ROSTER_SITES: [&str; 8] = ["BMHC", "CMC", "DCH", "FH", "FMOLHS", "HKH", "MCHS", "NMHS"];

macro_rules! roster_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// All values in canonical order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            /// Display text.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ReportError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ReportError::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

roster_enum!(
    /// Clinical role of a provider.
    ProviderType, "provider type" {
        /// Physician.
        Physician => "Physician",
        /// Advanced practice clinician.
        Apc => "APC",
    }
);

roster_enum!(
    /// Employment arrangement.
    WorkStatus, "work status" {
        /// Full time.
        FullTime => "FT",
        /// Part time.
        PartTime => "PT",
        /// As needed.
        Prn => "PRN",
        /// Locum.
        Locum => "LOC",
        /// Inactive list.
        InactiveList => "IL",
    }
);

roster_enum!(
    /// Record status of a provider.
    ProviderStatus, "provider status" {
        /// Credentialed and active.
        Active => "Active",
        /// Awaiting credentialing.
        Pending => "Pending",
        /// No longer active.
        Inactive => "Inactive",
    }
);

/// A provider on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterProvider {
    /// Record id.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Preferred first name.
    #[serde(default)]
    pub preferred_name: Option<String>,
    /// Clinical role.
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    /// Service lines (EM, HM, ...).
    pub service_lines: Vec<String>,
    /// Sites the provider works at.
    pub sites: Vec<String>,
    /// Employment arrangement.
    pub work_status: WorkStatus,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Record status.
    pub status: ProviderStatus,
}

impl RosterProvider {
    /// Cell text for a table column.
    #[must_use]
    pub fn cell(&self, column: RosterColumn) -> String {
        match column {
            RosterColumn::Name => self.name.clone(),
            RosterColumn::PreferredName => self.preferred_name.clone().unwrap_or_default(),
            RosterColumn::Type => self.provider_type.to_string(),
            RosterColumn::ServiceLines => self.service_lines.join(", "),
            RosterColumn::Sites => self.sites.join(", "),
            RosterColumn::WorkStatus => self.work_status.to_string(),
            RosterColumn::Email => self.email.clone(),
            RosterColumn::Phone => self.phone.clone(),
            RosterColumn::Status => self.status.to_string(),
        }
    }

    fn matches_query(&self, needle: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(needle);
        hit(&self.name)
            || self.preferred_name.as_deref().is_some_and(hit)
            || hit(&self.email)
            || hit(&self.phone)
            || self.sites.iter().any(|s| hit(s))
            || self.service_lines.iter().any(|s| hit(s))
            || hit(self.provider_type.as_str())
    }
}

#[allow(clippy::too_many_arguments)]
fn provider(
    id: &str,
    name: &str,
    preferred: &str,
    provider_type: ProviderType,
    service_lines: &[&str],
    sites: &[&str],
    work_status: WorkStatus,
    status: ProviderStatus,
) -> RosterProvider {
    let number = id.trim_start_matches('p');
    RosterProvider {
        id: id.to_string(),
        name: name.to_string(),
        preferred_name: Some(preferred.to_string()),
        provider_type,
        service_lines: service_lines.iter().map(ToString::to_string).collect(),
        sites: sites.iter().map(ToString::to_string).collect(),
        work_status,
        email: format!(
            "{}@reliashealthcare.com",
            name.to_lowercase().replace(' ', ".")
        ),
        phone: format!("(555) 201-10{number:0>2}"),
        status,
    }
}

/// The mock roster used by the portal.
#[must_use]
pub fn sample_roster() -> Vec<RosterProvider> {
    use ProviderStatus::{Active, Pending};
    use ProviderType::{Apc, Physician};
    use WorkStatus::{FullTime, InactiveList, Locum, PartTime, Prn};

    vec![
        provider("p1", "Sarah Johnson", "Sarah", Physician, &["EM"], &["NMHS", "FH"], FullTime, Active),
        provider("p2", "Maria Garcia", "Maria", Apc, &["HM"], &["NMHS", "MCHS"], PartTime, Active),
        provider("p3", "Alex Rivera", "Alex", Physician, &["EM", "HM"], &["NMHS"], FullTime, Active),
        provider("p4", "Jordan Lee", "Jordan", Apc, &["EM"], &["FH", "CMC"], Prn, Active),
        provider("p5", "Sam Taylor", "Sam", Physician, &["HM"], &["NMHS", "DCH"], FullTime, Active),
        provider("p6", "Chris Chen", "Chris", Physician, &["EM"], &["BMHC", "HKH"], PartTime, Active),
        provider("p7", "Jamie Foster", "Jamie", Apc, &["HM"], &["NMHS"], Prn, Pending),
        provider("p8", "Morgan Wright", "Morgan", Physician, &["EM"], &["FMOLHS", "MCHS"], Locum, Active),
        provider("p9", "Riley Davis", "Riley", Apc, &["EM", "HM"], &["HKH"], InactiveList, Active),
    ]
}

/// Search filters applied to the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterFilters {
    /// Free-text query.
    pub query: Option<String>,
    /// Required site.
    pub site: Option<String>,
    /// Required work status (`None` = all).
    pub work_status: Option<WorkStatus>,
}

/// Providers matching every filter, in roster order.
#[must_use]
pub fn filter_providers(providers: &[RosterProvider], filters: &RosterFilters) -> Vec<RosterProvider> {
    let needle = filters
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    providers
        .iter()
        .filter(|p| needle.as_deref().map_or(true, |q| p.matches_query(q)))
        .filter(|p| {
            filters
                .site
                .as_deref()
                .filter(|s| !s.is_empty())
                .map_or(true, |site| p.sites.iter().any(|s| s == site))
        })
        .filter(|p| filters.work_status.map_or(true, |ws| p.work_status == ws))
        .cloned()
        .collect()
}

/// Columns of the roster table, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RosterColumn {
    /// Provider name.
    Name,
    /// Preferred name.
    PreferredName,
    /// Provider type.
    Type,
    /// Service lines.
    ServiceLines,
    /// Sites.
    Sites,
    /// Work status.
    WorkStatus,
    /// Email.
    Email,
    /// Phone.
    Phone,
    /// Record status.
    Status,
}

impl RosterColumn {
    /// All columns in canonical order.
    pub const ALL: [RosterColumn; 9] = [
        Self::Name,
        Self::PreferredName,
        Self::Type,
        Self::ServiceLines,
        Self::Sites,
        Self::WorkStatus,
        Self::Email,
        Self::Phone,
        Self::Status,
    ];

    /// Stable identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PreferredName => "preferredName",
            Self::Type => "type",
            Self::ServiceLines => "serviceLines",
            Self::Sites => "sites",
            Self::WorkStatus => "workStatus",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Status => "status",
        }
    }

    /// Header label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Provider Name",
            Self::PreferredName => "Preferred Name",
            Self::Type => "Type",
            Self::ServiceLines => "Service Lines",
            Self::Sites => "Sites",
            Self::WorkStatus => "Work Status",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Status => "Status",
        }
    }
}

impl FromStr for RosterColumn {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReportError::UnknownColumn(s.to_string()))
    }
}

/// The user's subset of table columns. Iteration is always canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    selected: Vec<RosterColumn>,
}

impl ColumnSelection {
    /// Every column selected.
    #[must_use]
    pub fn all() -> Self {
        Self {
            selected: RosterColumn::ALL.to_vec(),
        }
    }

    /// Selection from column ids or labels.
    ///
    /// # Errors
    ///
    /// Returns an error on an unknown column.
    pub fn parse<'a>(ids: impl IntoIterator<Item = &'a str>) -> ReportResult<Self> {
        let mut selection = Self::default();
        for id in ids {
            let column: RosterColumn = id.trim().parse()?;
            if !selection.contains(column) {
                selection.selected.push(column);
            }
        }
        Ok(selection)
    }

    /// Flip a column in or out of the selection.
    pub fn toggle(&mut self, column: RosterColumn) {
        if let Some(pos) = self.selected.iter().position(|c| *c == column) {
            self.selected.remove(pos);
        } else {
            self.selected.push(column);
        }
    }

    /// Whether a column is selected.
    #[must_use]
    pub fn contains(&self, column: RosterColumn) -> bool {
        self.selected.contains(&column)
    }

    /// Number of selected columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected columns in canonical order.
    #[must_use]
    pub fn columns(&self) -> Vec<RosterColumn> {
        RosterColumn::ALL
            .iter()
            .copied()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Selected columns, or every column when nothing is selected.
    #[must_use]
    pub fn effective_columns(&self) -> Vec<RosterColumn> {
        if self.is_empty() {
            RosterColumn::ALL.to_vec()
        } else {
            self.columns()
        }
    }
}

/// Dimension the chart block groups providers by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartCategory {
    /// Providers per site.
    #[default]
    Site,
    /// Providers per work status.
    WorkStatus,
    /// Providers per record status.
    Status,
    /// Providers per type.
    Type,
}

impl ChartCategory {
    /// Human label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::WorkStatus => "Work Status",
            Self::Status => "Status",
            Self::Type => "Type",
        }
    }

    /// Whether the category is a status/type breakdown drawn as a pie.
    #[must_use]
    pub fn is_pie(self) -> bool {
        matches!(self, Self::Status | Self::Type)
    }
}

impl FromStr for ChartCategory {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "site" => Ok(Self::Site),
            "workstatus" => Ok(Self::WorkStatus),
            "status" => Ok(Self::Status),
            "type" => Ok(Self::Type),
            _ => Err(ReportError::InvalidValue {
                field: "chart category",
                value: s.to_string(),
            }),
        }
    }
}

/// Count of providers for one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBucket {
    /// Category value.
    pub name: String,
    /// Number of providers.
    pub count: usize,
}

/// Provider counts per category value, in canonical value order.
///
/// Providers at several sites count once per site.
#[must_use]
pub fn chart_buckets(providers: &[RosterProvider], category: ChartCategory) -> Vec<ChartBucket> {
    fn tally<T: Copy + PartialEq + fmt::Display>(
        values: &[T],
        providers: &[RosterProvider],
        get: impl Fn(&RosterProvider) -> T,
    ) -> Vec<ChartBucket> {
        values
            .iter()
            .map(|v| ChartBucket {
                name: v.to_string(),
                count: providers.iter().filter(|p| get(p) == *v).count(),
            })
            .collect()
    }

    match category {
        ChartCategory::Site => ROSTER_SITES
            .iter()
            .map(|site| ChartBucket {
                name: (*site).to_string(),
                count: providers
                    .iter()
                    .filter(|p| p.sites.iter().any(|s| s == site))
                    .count(),
            })
            .collect(),
        ChartCategory::WorkStatus => tally(WorkStatus::ALL, providers, |p| p.work_status),
        ChartCategory::Status => tally(ProviderStatus::ALL, providers, |p| p.status),
        ChartCategory::Type => tally(ProviderType::ALL, providers, |p| p.provider_type),
    }
}

/// Buckets for a pie chart: zero counts dropped.
#[must_use]
pub fn pie_buckets(buckets: &[ChartBucket]) -> Vec<ChartBucket> {
    buckets.iter().filter(|b| b.count > 0).cloned().collect()
}
