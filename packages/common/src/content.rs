//! Enumerations for the marketing content read models (service catalogue and team roster).

#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use crate::label::labelled_enum;

labelled_enum! {
    "service category" enum ServiceCategory {
        Foundation => "foundation",
        Analytics => "analytics",
        Ai => "ai",
        Governance => "governance",
    }
}

labelled_enum! {
    "availability" enum Availability {
        Available => "available",
        ComingSoon => "coming-soon",
        Limited => "limited",
        SoldOut => "sold-out",
    }
}

labelled_enum! {
    "team category" enum TeamCategory {
        Leadership => "leadership",
        Core => "core",
        Consultant => "consultant",
        Analyst => "analyst",
    }
}

labelled_enum! {
    "department" enum Department {
        Research => "research",
        Engineering => "engineering",
        Analytics => "analytics",
        Consulting => "consulting",
        Management => "management",
    }
}
