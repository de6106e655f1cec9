//! Test fixtures and data for auditor tests

#![allow(dead_code)]

use chrono::NaiveDate;
use shared::{AugmentedText, ExplanationSource};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const SESSION: &'static str = "550e8400-e29b-41d4-a716-446655440001";
    pub const INPUT_PATH: &'static str = "subscriptions.csv";

    /// 2024-06-01, the as-of date every fixture is written against
    pub fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// Netflix last used 200 days before the as-of date, Slack yesterday
    pub fn netflix_and_slack() -> &'static str {
        "name,monthly_cost,last_used_date,usage_count,category\n\
         Netflix,15.00,2023-11-14,1,streaming\n\
         Slack,8.00,2024-05-31,300,communication\n"
    }

    /// Five subscriptions plus one row with an unparseable date
    pub fn mixed_with_malformed() -> &'static str {
        "Service,Amount,Last Used,Uses,Category\n\
         Netflix,$15.99,2023-11-14,1,streaming\n\
         Slack,$8.00,2024-05-31,300,communication\n\
         Gym Pass,$40.00,2024-01-10,0,health\n\
         Broken Row,$12.00,someday,4,misc\n\
         GitHub,$4.00,2024-05-30,120,devops\n\
         Audible,$14.95,2024-02-01,2,books\n"
    }

    /// Headers that cannot be mapped onto the required fields
    pub fn missing_columns() -> &'static str {
        "title,notes\nNetflix,cancel soon\n"
    }

    pub fn model_text() -> AugmentedText {
        AugmentedText {
            summary: "Netflix has barely been used since November.".to_string(),
            next_steps: vec!["Cancel Netflix under Account > Membership.".to_string()],
            source: ExplanationSource::Model,
        }
    }
}
