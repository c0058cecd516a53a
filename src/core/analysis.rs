//! Budget health classification for auction teams.
//!
//! Every team is rated on its own from its remaining budget and filled roster
//! slots, against the tournament's credit and slot totals.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::Error;

/// Spending behaviour of a team, first matching rule wins.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BudgetStatus {
    Complete,
    HighRisk,
    Aggressive,
    Saver,
    SmartBuy,
    Balanced,
}

/// How a status is rendered by clients
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

impl BudgetStatus {
    pub fn badge(self) -> StatusBadge {
        let (label, color, icon) = match self {
            BudgetStatus::Complete => ("Complete", "#10b981", "✅"),
            BudgetStatus::HighRisk => ("High Risk", "#ef4444", "⚠️"),
            BudgetStatus::Aggressive => ("Aggressive", "#f59e0b", "🔥"),
            BudgetStatus::Saver => ("Saver", "#3b82f6", "💎"),
            BudgetStatus::SmartBuy => ("Smart Buy", "#10b981", "🧠"),
            BudgetStatus::Balanced => ("Balanced", "var(--text-secondary)", "⚖️"),
        };
        StatusBadge { label, color, icon }
    }
}

impl Serialize for BudgetStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.badge().serialize(s)
    }
}

/// Auction parameters shared by every team in a request
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct AuctionContext {
    pub total_credits: f64,
    /// Roster size, truncated to a whole slot count
    pub players_per_team: i64,
    pub base_price: f64,
}

#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct TeamSnapshot {
    /// Credits left to spend
    pub budget: f64,

    /// Roster slots already filled
    pub players_count: i64,
}

#[derive(PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAnalysis {
    pub status: BudgetStatus,
    pub avg_budget: i64,
    pub remaining_slots: i64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub results: Vec<TeamAnalysis>,
}

/// Rates one team.
///
/// With no base price and no slots per team the risk threshold divides by
/// zero. The IEEE result is kept: `+inf` flags every unfinished team as high
/// risk, `NaN` (zero credits) never does.
pub fn classify_team(team: &TeamSnapshot, ctx: &AuctionContext) -> TeamAnalysis {
    let spent_pct = if ctx.total_credits > 0.0 {
        (ctx.total_credits - team.budget) / ctx.total_credits
    } else {
        0.0
    };

    let slots_pct = if ctx.players_per_team > 0 {
        team.players_count as f64 / ctx.players_per_team as f64
    } else {
        0.0
    };

    let remaining_slots = ctx.players_per_team.saturating_sub(team.players_count);
    let avg_budget = if remaining_slots > 0 {
        (team.budget / remaining_slots as f64).floor() as i64
    } else {
        0
    };

    let status = if remaining_slots == 0 {
        BudgetStatus::Complete
    } else {
        let risk_threshold = if ctx.base_price > 0.0 {
            ctx.base_price * 1.5
        } else {
            (ctx.total_credits / ctx.players_per_team as f64) * 0.2
        };

        if (avg_budget as f64) < risk_threshold {
            BudgetStatus::HighRisk
        } else {
            let diff = spent_pct - slots_pct;
            if diff > 0.20 {
                BudgetStatus::Aggressive
            } else if diff < -0.15 {
                BudgetStatus::Saver
            } else if spent_pct < 0.2 && slots_pct > 0.4 {
                BudgetStatus::SmartBuy
            } else {
                BudgetStatus::Balanced
            }
        }
    };

    TeamAnalysis {
        status,
        avg_budget,
        remaining_slots,
    }
}

/// A validated classification request
#[derive(PartialEq, Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub context: AuctionContext,
    pub teams: Vec<TeamSnapshot>,
}

fn number(fields: &Value, key: &str) -> f64 {
    fields.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

impl AnalysisRequest {
    /// Reads a request body, optionally wrapped in an `auctionData` object.
    ///
    /// Missing or non-numeric fields count as zero. A body, wrapper or team
    /// that is not an object, or a `teams` value that is not a list, fails
    /// the whole request.
    pub fn from_json(body: &Value) -> Result<Self, Error> {
        if !body.is_object() {
            return Err("analysis request must be a JSON object".into());
        }

        let data = match body.get("auctionData") {
            Some(data) if data.is_object() => data,
            Some(_) => return Err("auctionData must be a JSON object".into()),
            None => body,
        };

        let context = AuctionContext {
            total_credits: number(data, "totalCredits"),
            players_per_team: number(data, "playersPerTeam").trunc() as i64,
            base_price: number(data, "basePrice"),
        };

        let teams: Vec<TeamSnapshot> = match data.get("teams") {
            None | Some(Value::Null) => vec![],
            Some(Value::Array(teams)) => teams
                .iter()
                .enumerate()
                .map(|(i, team)| {
                    if !team.is_object() {
                        return Err(Error::Validation(format!("team {} must be a JSON object", i)));
                    }
                    Ok(TeamSnapshot {
                        budget: number(team, "budget"),
                        players_count: team
                            .get("players")
                            .and_then(Value::as_array)
                            .map_or(0, |players| players.len() as i64),
                    })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => return Err("teams must be a list".into()),
        };

        Ok(AnalysisRequest { context, teams })
    }

    /// Rates every team, in input order.
    pub fn analyze(&self) -> AnalysisReport {
        AnalysisReport {
            results: self
                .teams
                .iter()
                .map(|team| classify_team(team, &self.context))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const CTX: AuctionContext = AuctionContext {
        total_credits: 1000.0,
        players_per_team: 5,
        base_price: 100.0,
    };

    fn team(budget: f64, players_count: i64) -> TeamSnapshot {
        TeamSnapshot {
            budget,
            players_count,
        }
    }

    fn status(budget: f64, players_count: i64, ctx: &AuctionContext) -> BudgetStatus {
        classify_team(&team(budget, players_count), ctx).status
    }

    #[test]
    fn test_untouched_team_is_balanced() {
        let result = classify_team(&team(1000.0, 0), &CTX);
        assert_eq!(
            result,
            TeamAnalysis {
                status: BudgetStatus::Balanced,
                avg_budget: 200,
                remaining_slots: 5
            }
        );
    }

    #[test]
    fn test_low_budget_is_high_risk() {
        let result = classify_team(&team(50.0, 3), &CTX);
        assert_eq!(result.status, BudgetStatus::HighRisk);
        assert_eq!(result.avg_budget, 25);
        assert_eq!(result.remaining_slots, 2);
    }

    #[test]
    fn test_full_roster_is_complete() {
        assert_eq!(status(0.0, 5, &CTX), BudgetStatus::Complete);
        assert_eq!(status(1000.0, 5, &CTX), BudgetStatus::Complete);

        let result = classify_team(&team(0.0, 5), &CTX);
        assert_eq!(result.avg_budget, 0);
        assert_eq!(result.remaining_slots, 0);
    }

    #[test]
    fn test_strategy_rules() {
        let cheap = AuctionContext {
            base_price: 10.0,
            ..CTX
        };

        // spent 60%, filled 20%
        assert_eq!(status(400.0, 1, &cheap), BudgetStatus::Aggressive);
        // spent 10%, filled 60%
        assert_eq!(status(900.0, 3, &cheap), BudgetStatus::Saver);
        // spent 50%, filled 40%
        assert_eq!(status(500.0, 2, &cheap), BudgetStatus::Balanced);
    }

    #[test]
    fn test_saver_checked_before_smart_buy() {
        // Under 20% spent with over 40% filled always trips the saver rule first.
        let wide = AuctionContext {
            total_credits: 1000.0,
            players_per_team: 10,
            base_price: 1.0,
        };
        assert_eq!(status(850.0, 5, &wide), BudgetStatus::Saver);
    }

    #[test]
    fn test_average_budget_rounds_down() {
        let result = classify_team(
            &team(1000.0, 2),
            &AuctionContext {
                base_price: 1.0,
                ..CTX
            },
        );
        assert_eq!(result.remaining_slots, 3);
        assert_eq!(result.avg_budget, 333);
    }

    #[test]
    fn test_overfilled_roster() {
        let result = classify_team(&team(500.0, 6), &CTX);
        assert_eq!(result.remaining_slots, -1);
        assert_eq!(result.avg_budget, 0);
        assert_eq!(result.status, BudgetStatus::HighRisk);
    }

    #[test]
    fn test_fallback_threshold() {
        let no_base = AuctionContext {
            base_price: 0.0,
            ..CTX
        };
        // threshold = 1000 / 5 * 0.2 = 40
        assert_eq!(status(60.0, 3, &no_base), BudgetStatus::HighRisk);
        assert_eq!(classify_team(&team(60.0, 3), &no_base).avg_budget, 30);
        assert_ne!(status(200.0, 3, &no_base), BudgetStatus::HighRisk);
    }

    #[test]
    fn test_zero_totals() {
        let no_credits = AuctionContext {
            total_credits: 0.0,
            ..CTX
        };
        // spent counts as 0%, filled 40%
        assert_eq!(status(1000.0, 2, &no_credits), BudgetStatus::Saver);

        let no_slots = AuctionContext {
            players_per_team: 0,
            ..CTX
        };
        let result = classify_team(&team(1000.0, 2), &no_slots);
        assert_eq!(result.remaining_slots, -2);
        assert_eq!(result.status, BudgetStatus::HighRisk);
        assert_eq!(status(1000.0, 0, &no_slots), BudgetStatus::Complete);
    }

    #[test]
    fn test_zero_slots_without_base_price() {
        let ctx = AuctionContext {
            total_credits: 1000.0,
            players_per_team: 0,
            base_price: 0.0,
        };
        // Infinite threshold
        assert_eq!(status(1000.0, 1, &ctx), BudgetStatus::HighRisk);

        let ctx = AuctionContext {
            total_credits: 0.0,
            ..ctx
        };
        // NaN threshold, nothing spent or filled
        assert_eq!(status(1000.0, 1, &ctx), BudgetStatus::Balanced);
    }

    #[test]
    fn test_extreme_slot_counts() {
        let request = AnalysisRequest::from_json(&json!({
            "playersPerTeam": -1e30,
            "teams": [{ "players": [1] }]
        }))
        .unwrap();
        assert_eq!(request.context.players_per_team, i64::MIN);

        let result = request.analyze().results[0];
        assert_eq!(result.remaining_slots, i64::MIN);
        assert_eq!(result.avg_budget, 0);
        assert_eq!(result.status, BudgetStatus::Balanced);

        let result = classify_team(
            &team(1000.0, 1),
            &AuctionContext {
                total_credits: 1000.0,
                players_per_team: i64::MAX,
                base_price: 1.0,
            },
        );
        assert_eq!(result.remaining_slots, i64::MAX - 1);
        assert_eq!(result.status, BudgetStatus::HighRisk);
    }

    #[test]
    fn test_fractional_slot_count_truncates() {
        let request = AnalysisRequest::from_json(&json!({
            "playersPerTeam": 5.9,
            "totalCredits": 1000,
            "basePrice": 100,
            "teams": [{ "budget": 0, "players": [1, 2, 3, 4, 5] }]
        }))
        .unwrap();
        assert_eq!(request.context.players_per_team, 5);
        assert_eq!(request.analyze().results[0].status, BudgetStatus::Complete);
    }

    #[test]
    fn test_deterministic() {
        let request = AnalysisRequest {
            context: CTX,
            teams: vec![team(1000.0, 0), team(50.0, 3), team(0.0, 5)],
        };
        assert_eq!(request.analyze(), request.analyze());
    }

    #[test]
    fn test_badges() {
        assert_eq!(
            BudgetStatus::Complete.badge(),
            StatusBadge {
                label: "Complete",
                color: "#10b981",
                icon: "✅"
            }
        );
        assert_eq!(BudgetStatus::HighRisk.badge().icon, "⚠️");
        assert_eq!(BudgetStatus::Aggressive.badge().color, "#f59e0b");
        assert_eq!(BudgetStatus::Saver.badge().label, "Saver");
        assert_eq!(BudgetStatus::SmartBuy.badge().icon, "🧠");
        assert_eq!(BudgetStatus::Balanced.badge().color, "var(--text-secondary)");
    }

    #[test]
    fn test_report_json() {
        let report = AnalysisRequest {
            context: CTX,
            teams: vec![team(50.0, 3)],
        }
        .analyze();

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "results": [{
                    "status": { "label": "High Risk", "color": "#ef4444", "icon": "⚠️" },
                    "avgBudget": 25,
                    "remainingSlots": 2
                }]
            })
        );
    }

    #[test]
    fn test_parse_request() {
        let request = AnalysisRequest::from_json(&json!({
            "teams": [
                { "name": "Lions", "budget": 700, "players": [{ "name": "A" }, { "name": "B" }] },
                { "name": "Tigers" },
                { "budget": "lots", "players": "none" }
            ],
            "totalCredits": 1000,
            "playersPerTeam": 5,
            "basePrice": 100
        }))
        .unwrap();

        assert_eq!(request.context, CTX);
        assert_eq!(
            request.teams,
            vec![team(700.0, 2), team(0.0, 0), team(0.0, 0)]
        );
    }

    #[test]
    fn test_parse_wrapped_request() {
        let request = AnalysisRequest::from_json(&json!({
            "auctionData": {
                "teams": [{ "budget": 1000, "players": [] }],
                "totalCredits": 1000,
                "playersPerTeam": 5,
                "basePrice": 100
            },
            "timestamp": 1
        }))
        .unwrap();

        assert_eq!(request.context, CTX);
        assert_eq!(request.analyze().results[0].status, BudgetStatus::Balanced);
    }

    #[test]
    fn test_parse_defaults() {
        let request = AnalysisRequest::from_json(&json!({})).unwrap();
        assert_eq!(request, AnalysisRequest::default());
        assert!(request.analyze().results.is_empty());

        let request = AnalysisRequest::from_json(&json!({ "teams": null })).unwrap();
        assert!(request.teams.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_shapes() {
        for body in [
            json!([]),
            json!("teams"),
            json!(null),
            json!({ "teams": {} }),
            json!({ "teams": "abc" }),
            json!({ "teams": [{ "budget": 1 }, 3] }),
            json!({ "auctionData": [] }),
        ] {
            assert!(
                matches!(AnalysisRequest::from_json(&body), Err(Error::Validation(_))),
                "{} should be rejected",
                body
            );
        }
    }
}
