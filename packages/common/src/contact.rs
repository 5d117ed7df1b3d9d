#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use crate::label::labelled_enum;

labelled_enum! {
    /// The service a prospective client asked about on the contact form.
    "service interest" enum ServiceInterest {
        DataEngineering => "data-engineering",
        PredictiveAnalytics => "predictive-analytics",
        AiMl => "ai-ml",
        BusinessIntelligence => "business-intelligence",
        LlmIntegration => "llm-integration",
        Consulting => "consulting",
        Other => "other",
    }
}

impl ServiceInterest {
    /// Maps free-form input onto the enumeration. Unknown values become `Other`.
    pub fn coerce(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::Other)
    }

    /// Priority assigned to a fresh lead with this interest.
    pub fn lead_priority(&self) -> Priority {
        match self {
            Self::Consulting | Self::AiMl => Priority::High,
            _ => Priority::Medium,
        }
    }
}

impl Default for ServiceInterest {
    fn default() -> Self {
        Self::Other
    }
}

labelled_enum! {
    /// Triage state of a lead.
    "status" enum ContactStatus {
        /// Just submitted; nobody has reached out yet.
        New => "new",
        Contacted => "contacted",
        Qualified => "qualified",
        Closed => "closed",
    }
}

impl Default for ContactStatus {
    fn default() -> Self {
        Self::New
    }
}

labelled_enum! {
    "priority" enum Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Origin channel recorded on every lead taken by the website form.
pub const WEBSITE_SOURCE: &str = "website";
