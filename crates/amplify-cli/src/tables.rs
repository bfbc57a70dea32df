//! Table layouts for each record kind.

use amplify_table::{Column, DataTable};
use chrono::{DateTime, Utc};

use crate::types::{Campaign, CampaignInfluencer, Content, Influencer, Organization, Profile};

fn or_dash(value: Option<&str>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

fn timestamp(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// Budget in minor units shown with two decimals.
fn budget(cents: Option<u64>) -> String {
    cents.map_or_else(|| "-".to_string(), |c| format!("{}.{:02}", c / 100, c % 100))
}

pub fn profile(rows: Vec<Profile>) -> DataTable<Profile> {
    DataTable::new(
        vec![
            Column::new("User", "user_id"),
            Column::new("Email", "email"),
            Column::new("Organization", "organization_id")
                .render_with(|p: &Profile| or_dash(p.organization_id.as_deref())),
        ],
        rows,
    )
}

pub fn organizations(rows: Vec<Organization>) -> DataTable<Organization> {
    DataTable::new(
        vec![
            Column::new("ID", "organization_id"),
            Column::new("Name", "name"),
            Column::new("Created", "created_at")
                .render_with(|o: &Organization| timestamp(Some(&o.created_at))),
        ],
        rows,
    )
}

pub fn influencers(rows: Vec<Influencer>) -> DataTable<Influencer> {
    DataTable::new(
        vec![
            Column::new("ID", "influencer_id"),
            Column::new("Name", "name"),
            Column::new("Email", "email"),
            Column::new("Handles", "social_handles").render_with(|i: &Influencer| {
                i.social_handles
                    .iter()
                    .map(|(platform, handle)| format!("{platform}:{handle}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            }),
            Column::new("Categories", "categories")
                .render_with(|i: &Influencer| i.categories.join(", ")),
        ],
        rows,
    )
}

pub fn campaigns(rows: Vec<Campaign>) -> DataTable<Campaign> {
    DataTable::new(
        vec![
            Column::new("ID", "campaign_id"),
            Column::new("Name", "name"),
            Column::new("Status", "status"),
            Column::new("Start", "start_date"),
            Column::new("End", "end_date"),
            Column::new("Budget", "budget_cents").render_with(|c: &Campaign| budget(c.budget_cents)),
        ],
        rows,
    )
}

pub fn links(rows: Vec<CampaignInfluencer>) -> DataTable<CampaignInfluencer> {
    DataTable::new(
        vec![
            Column::new("ID", "link_id"),
            Column::new("Influencer", "influencer_id"),
            Column::new("Status", "status"),
            Column::new("Deliverables", "deliverables")
                .render_with(|l: &CampaignInfluencer| l.deliverables.join("; ")),
        ],
        rows,
    )
}

pub fn content(rows: Vec<Content>) -> DataTable<Content> {
    DataTable::new(
        vec![
            Column::new("ID", "content_id"),
            Column::new("Platform", "platform"),
            Column::new("Type", "content_type"),
            Column::new("Status", "status"),
            Column::new("Scheduled", "scheduled_at")
                .render_with(|c: &Content| timestamp(c.scheduled_at.as_ref())),
            Column::new("URL", "url").render_with(|c: &Content| or_dash(c.url.as_deref())),
        ],
        rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(name: &str, status: &str, budget_cents: Option<u64>) -> Campaign {
        Campaign {
            campaign_id: format!("id-{name}"),
            name: name.to_string(),
            description: None,
            start_date: None,
            end_date: None,
            budget_cents,
            status: status.to_string(),
        }
    }

    #[test]
    fn budget_formatting() {
        assert_eq!(budget(Some(150_000)), "1500.00");
        assert_eq!(budget(Some(5)), "0.05");
        assert_eq!(budget(None), "-");
    }

    #[test]
    fn campaign_search_matches_status() {
        let mut table = campaigns(vec![
            campaign("Spring", "active", Some(10_000)),
            campaign("Autumn", "draft", None),
        ]);
        table.set_search("DRAFT");

        let rendered = table.render();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered.rows[0][1], "Autumn");
        assert_eq!(rendered.rows[0][5], "-");
    }

    #[test]
    fn content_renders_unscheduled_as_dash() {
        let table = content(vec![Content {
            content_id: "c1".to_string(),
            link_id: "l1".to_string(),
            platform: "tiktok".to_string(),
            content_type: "video".to_string(),
            url: None,
            scheduled_at: None,
            published_at: None,
            status: "planned".to_string(),
        }]);

        let rendered = table.render();
        assert_eq!(rendered.rows[0][4], "-");
        assert_eq!(rendered.rows[0][5], "-");
    }
}
