use super::*;
use chrono::{TimeZone, Utc};

#[test]
fn test_initial_quota_matches_catalog() {
    let quota = PowerUpQuota::initial();
    assert_eq!(quota.remaining(PowerUpKind::Toep), Some(5));
    assert_eq!(quota.remaining(PowerUpKind::CumbackKid), Some(1));
    assert_eq!(quota.remaining(PowerUpKind::PullThePlug), Some(1));
    assert_eq!(quota.remaining(PowerUpKind::BigRack), Some(1));
    assert_eq!(quota.remaining(PowerUpKind::Sniper), Some(3));
    assert_eq!(quota.remaining(PowerUpKind::BallBounty), Some(5));
    assert_eq!(quota.remaining(PowerUpKind::DoubleTrouble), Some(1));
    assert_eq!(quota.remaining(PowerUpKind::Speedpot), Some(2));
    // Black Ball is unlimited and not tracked.
    assert_eq!(quota.remaining(PowerUpKind::BlackBall), None);
}

#[test]
fn test_quota_consume_to_exhaustion() {
    let mut quota = PowerUpQuota::initial();
    assert!(quota.try_consume(PowerUpKind::CumbackKid).is_ok());
    assert_eq!(quota.remaining(PowerUpKind::CumbackKid), Some(0));
    assert_eq!(
        quota.try_consume(PowerUpKind::CumbackKid),
        Err(Error::QuotaExceeded(PowerUpKind::CumbackKid))
    );
    // Failed consume does not go negative.
    assert_eq!(quota.remaining(PowerUpKind::CumbackKid), Some(0));
}

#[test]
fn test_unlimited_kind_never_exhausts() {
    let mut quota = PowerUpQuota::initial();
    for _ in 0..100 {
        assert!(quota.try_consume(PowerUpKind::BlackBall).is_ok());
    }
}

#[test]
fn test_slot_opponent() {
    assert_eq!(PlayerSlot::A.opponent(), PlayerSlot::B);
    assert_eq!(PlayerSlot::B.opponent(), PlayerSlot::A);
}

#[test]
fn test_per_player_indexing() {
    let mut pair = PerPlayer::new(1u8, 2u8);
    assert_eq!(pair[PlayerSlot::A], 1);
    assert_eq!(pair[PlayerSlot::B], 2);
    pair[PlayerSlot::B] = 5;
    assert_eq!(pair.get(PlayerSlot::B), &5);
}

#[test]
fn test_usage_any() {
    let mut usage = PowerUpUsage::default();
    assert!(!usage.any());
    usage.speedpot = true;
    assert!(usage.any());

    let sniper_only = PowerUpUsage {
        sniper: Some(SniperAttempt {
            balls_potted: 3,
            successful: true,
        }),
        ..Default::default()
    };
    assert!(sniper_only.any());
}

#[test]
fn test_live_game_new() {
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 20, 0, 0).unwrap();
    let game = LiveGame::new(LiveGameId::random(), now);
    assert!(game.is_active());
    assert_eq!(game.balls, PerPlayer::new(7, 7));
    assert_eq!(game.escalation_level, 0);
    assert_eq!(game.pending_escalation, None);
    assert_eq!(game.winner, None);
}

#[test]
fn test_game_state_roundtrip() {
    let now = Utc.with_ymd_and_hms(2026, 8, 24, 19, 30, 0).unwrap();
    let mut state = GameState::new("Ayla", "Bram", MonthKey::from_datetime(&now));
    state.players[PlayerSlot::A].streak = 3;
    state.players[PlayerSlot::A].monthly_total = Money::from_cents(750);
    let record = MatchRecord {
        id: MatchId::random(),
        timestamp: now,
        month: state.month,
        winner: PlayerSlot::A,
        loser: PlayerSlot::B,
        win_condition: WinCondition::Normal,
        loser_balls: 4,
        own_balls: PerPlayer::new(2, 4),
        stake_multiplier: 1,
        power_ups: PerPlayer::new(
            Some(PowerUpUsage {
                toep: true,
                ..Default::default()
            }),
            None,
        ),
        streak_before: StreakPair { winner: 2, loser: 1 },
        streak_after: StreakPair { winner: 4, loser: 0 },
        amount_won: Money::from_cents(400),
        ball_bounty: None,
        black_ball_bonus: false,
        capped: false,
    };
    state.last_match_id = Some(record.id);
    state.matches.push(record);

    let json = serde_json::to_string(&state).expect("serialize");
    let decoded: GameState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(state, decoded);
}

#[test]
fn test_wins_in_month() {
    let now = Utc.with_ymd_and_hms(2026, 8, 24, 19, 30, 0).unwrap();
    let month = MonthKey::from_datetime(&now);
    let mut state = GameState::new("Ayla", "Bram", month);
    for winner in [PlayerSlot::A, PlayerSlot::A, PlayerSlot::B] {
        state.matches.push(MatchRecord {
            id: MatchId::random(),
            timestamp: now,
            month,
            winner,
            loser: winner.opponent(),
            win_condition: WinCondition::Normal,
            loser_balls: 0,
            own_balls: PerPlayer::new(0, 0),
            stake_multiplier: 1,
            power_ups: PerPlayer::new(None, None),
            streak_before: StreakPair { winner: 0, loser: 0 },
            streak_after: StreakPair { winner: 1, loser: 0 },
            amount_won: Money::from_cents(50),
            ball_bounty: None,
            black_ball_bonus: false,
            capped: false,
        });
    }
    assert_eq!(state.wins_in_month(PlayerSlot::A, month), 2);
    assert_eq!(state.wins_in_month(PlayerSlot::B, month), 1);
    let other = MonthKey::new(2026, 7).unwrap();
    assert_eq!(state.wins_in_month(PlayerSlot::A, other), 0);
}
