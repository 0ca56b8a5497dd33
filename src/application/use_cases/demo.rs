use serde::Serialize;

use crate::{
    app_error::AppResult,
    use_cases::{
        auth::AuthUseCases, campaign::CampaignUseCases, contact::ContactUseCases,
        waitlist::WaitlistUseCases,
    },
};

pub const DEMO_FEATURES: [&str; 6] = [
    "AI-personalized outreach sequences",
    "Contact enrichment and lead scoring",
    "Multi-channel campaign scheduling",
    "Reply detection and sentiment tagging",
    "CRM sync",
    "Pipeline analytics dashboard",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DemoCounts {
    pub users: u64,
    pub contacts: u64,
    pub campaigns: u64,
    pub waitlist: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoStats {
    pub stats: DemoCounts,
    pub features: Vec<&'static str>,
}

/// Aggregate counts across every collection, for the public demo page.
pub async fn collect_stats(
    auth: &AuthUseCases,
    contacts: &ContactUseCases,
    campaigns: &CampaignUseCases,
    waitlist: &WaitlistUseCases,
) -> AppResult<DemoStats> {
    let (users, contacts, campaigns, waitlist) = tokio::try_join!(
        auth.count_users(),
        contacts.count(),
        campaigns.count(),
        waitlist.count(),
    )?;

    Ok(DemoStats {
        stats: DemoCounts {
            users,
            contacts,
            campaigns,
            waitlist,
        },
        features: DEMO_FEATURES.to_vec(),
    })
}
