//! Table definitions.

/// Version 1: patterns, predictions, outcomes.
pub const TABLES_V1: &str = "
    CREATE TABLE IF NOT EXISTS patterns (
        name TEXT PRIMARY KEY NOT NULL,
        factor_a_code TEXT NOT NULL,
        factor_b_code TEXT NOT NULL,
        interaction_type TEXT NOT NULL,
        multiplier REAL NOT NULL,
        threshold_value REAL NOT NULL DEFAULT 0.5,
        confidence REAL NOT NULL,
        sample_size INTEGER NOT NULL DEFAULT 0,
        success_rate REAL,
        validated INTEGER NOT NULL DEFAULT 0,
        active INTEGER NOT NULL DEFAULT 1,
        updated_at INTEGER NOT NULL DEFAULT (unixepoch())
    ) STRICT;

    CREATE TABLE IF NOT EXISTS predictions (
        prediction_id TEXT PRIMARY KEY NOT NULL,
        created_at TEXT NOT NULL,
        fingerprint TEXT NOT NULL,
        home_team TEXT NOT NULL,
        away_team TEXT NOT NULL,
        favorite TEXT NOT NULL,
        underdog TEXT NOT NULL,
        side_a_score REAL NOT NULL,
        side_b_score REAL NOT NULL,
        naive_upset_prob REAL NOT NULL,
        interaction_boost REAL NOT NULL,
        final_upset_prob REAL NOT NULL,
        confidence_score REAL NOT NULL,
        confidence_level TEXT NOT NULL,
        body TEXT NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS outcomes (
        prediction_id TEXT PRIMARY KEY NOT NULL REFERENCES predictions(prediction_id),
        actual_home_score INTEGER NOT NULL,
        actual_away_score INTEGER NOT NULL,
        was_upset INTEGER NOT NULL,
        prediction_correct INTEGER NOT NULL,
        probability_error REAL NOT NULL,
        updated_patterns TEXT NOT NULL DEFAULT '[]',
        recorded_at TEXT NOT NULL
    ) STRICT;

    CREATE INDEX IF NOT EXISTS idx_predictions_fixture ON predictions(home_team, away_team);
    CREATE INDEX IF NOT EXISTS idx_patterns_active ON patterns(active);
";

/// Version 2: outcome claims, so an outcome is consumed once across processes.
/// `applied` lists patterns already updated by an interrupted attempt.
pub const TABLES_V2: &str = "
    CREATE TABLE IF NOT EXISTS outcome_claims (
        prediction_id TEXT PRIMARY KEY NOT NULL REFERENCES predictions(prediction_id),
        state TEXT NOT NULL CHECK (state IN ('in_flight', 'interrupted', 'completed')),
        applied TEXT NOT NULL DEFAULT '[]',
        updated_at INTEGER NOT NULL DEFAULT (unixepoch())
    ) STRICT;

    INSERT OR IGNORE INTO outcome_claims (prediction_id, state, applied)
        SELECT prediction_id, 'completed', updated_patterns FROM outcomes;
";
