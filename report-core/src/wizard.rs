//! Two-step export wizard.
//!
//! Step 1 collects format, orientation, delivery and recipient. Step 2 is the
//! report builder, whose document lives with the host and is not touched
//! here. Cancelling or submitting resets every field.

use serde::{Deserialize, Serialize};

use crate::geometry::PageOrientation;
use crate::{ReportError, ReportResult};

/// Open wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    /// Step 1: export options.
    Configuring,
    /// Step 2: report builder.
    Building,
}

/// Export file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Single-page PDF.
    Pdf,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type of the generated file.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ReportError::InvalidValue {
                field: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// What happens to the generated file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryAction {
    /// Save locally.
    #[default]
    Download,
    /// Send to a recipient (simulated).
    Email,
}

impl std::str::FromStr for DeliveryAction {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "download" => Ok(Self::Download),
            "email" => Ok(Self::Email),
            _ => Err(ReportError::InvalidValue {
                field: "delivery",
                value: s.to_string(),
            }),
        }
    }
}

/// Where the export goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Delivery {
    /// Save locally.
    Download,
    /// Simulated email to a recipient.
    Email {
        /// Trimmed recipient address.
        recipient: String,
    },
}

/// A submitted export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// File format.
    pub format: ExportFormat,
    /// Page orientation. Always portrait for CSV.
    pub orientation: PageOrientation,
    /// Delivery target.
    pub delivery: Delivery,
}

/// Export wizard state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportWizard {
    step: Option<WizardStep>,
    /// Selected format.
    pub format: ExportFormat,
    /// Selected orientation, used by PDF only.
    pub orientation: PageOrientation,
    /// Selected delivery.
    pub delivery: DeliveryAction,
    /// Recipient for email delivery.
    pub recipient: String,
}

impl ExportWizard {
    /// A closed wizard with default fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step, `None` when closed.
    #[must_use]
    pub fn step(&self) -> Option<WizardStep> {
        self.step
    }

    /// Whether the wizard is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.step.is_some()
    }

    /// Open at step 1. Opening an already open wizard keeps its state.
    pub fn open(&mut self) {
        if self.step.is_none() {
            self.step = Some(WizardStep::Configuring);
            tracing::debug!("Export wizard opened");
        }
    }

    /// Step 1 to step 2.
    ///
    /// # Errors
    ///
    /// Returns an error unless the wizard is at step 1.
    pub fn next(&mut self) -> ReportResult<()> {
        match self.step {
            Some(WizardStep::Configuring) => {
                self.step = Some(WizardStep::Building);
                tracing::debug!("Export wizard at step 2");
                Ok(())
            }
            other => Err(ReportError::WrongStep(other)),
        }
    }

    /// Step 2 back to step 1, keeping every field.
    ///
    /// # Errors
    ///
    /// Returns an error unless the wizard is at step 2.
    pub fn back(&mut self) -> ReportResult<()> {
        match self.step {
            Some(WizardStep::Building) => {
                self.step = Some(WizardStep::Configuring);
                tracing::debug!("Export wizard back at step 1");
                Ok(())
            }
            other => Err(ReportError::WrongStep(other)),
        }
    }

    /// Close and reset every field.
    pub fn cancel(&mut self) {
        *self = Self::default();
        tracing::debug!("Export wizard cancelled");
    }

    /// Whether submit is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.delivery != DeliveryAction::Email || !self.recipient.trim().is_empty()
    }

    /// The orientation an export will use.
    #[must_use]
    pub fn effective_orientation(&self) -> PageOrientation {
        match self.format {
            ExportFormat::Csv => PageOrientation::Portrait,
            ExportFormat::Pdf => self.orientation,
        }
    }

    /// Submit from step 2, returning the request and resetting the wizard.
    ///
    /// # Errors
    ///
    /// Returns an error when not at step 2, or when email delivery has no
    /// recipient. The wizard is unchanged on error.
    pub fn submit(&mut self) -> ReportResult<ExportRequest> {
        if self.step != Some(WizardStep::Building) {
            return Err(ReportError::WrongStep(self.step));
        }
        let delivery = match self.delivery {
            DeliveryAction::Download => Delivery::Download,
            DeliveryAction::Email => {
                let recipient = self.recipient.trim();
                if recipient.is_empty() {
                    return Err(ReportError::RecipientRequired);
                }
                Delivery::Email {
                    recipient: recipient.to_string(),
                }
            }
        };
        let request = ExportRequest {
            format: self.format,
            orientation: self.effective_orientation(),
            delivery,
        };
        *self = Self::default();
        tracing::debug!("Export wizard submitted {:?}", request.format);
        Ok(request)
    }
}
