//! Shared fixtures: a synthetic survey and a predictor fitted on it

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;
use stress_predictor::pipeline::StressPipeline;
use stress_predictor::preprocessing::PreprocessingConfig;
use stress_predictor::server::{create_router, AppState, ServerConfig};
use stress_predictor::training::LogisticRegression;
use stress_predictor::{FeatureSchema, LabelMap, Predictor};

pub const STAGES: [&str; 3] = ["undergraduate", "high school", "post-graduate"];
pub const ENVIRONMENTS: [&str; 3] = ["noisy", "peaceful", "disrupted"];
pub const STRATEGIES: [&str; 3] = ["exercise", "social support", "analyze the situation"];
pub const HABITS: [&str; 3] = ["none", "smoking", "drinking"];

/// One survey response
pub struct SurveyRow {
    pub stage: &'static str,
    pub peer: i64,
    pub home: i64,
    pub environment: &'static str,
    pub strategy: &'static str,
    pub habit: &'static str,
    pub competition: i64,
    pub stress: i64,
}

pub fn survey_rows(n: usize) -> Vec<SurveyRow> {
    (0..n)
        .map(|i| {
            let peer = (i % 5) as i64 + 1;
            let home = ((i / 5) % 5) as i64 + 1;
            let competition = ((i * 3) % 5) as i64 + 1;
            let stress = if peer + home > 6 {
                4
            } else if peer + home > 4 {
                3
            } else {
                2
            };
            SurveyRow {
                stage: STAGES[i % 3],
                peer,
                home,
                environment: ENVIRONMENTS[(i * 2) % 3],
                strategy: STRATEGIES[i % 3],
                habit: HABITS[(i * 2) % 3],
                competition,
                stress,
            }
        })
        .collect()
}

/// Feature frame under internal column names, plus the target
pub fn survey_frame(n: usize) -> (DataFrame, Vec<i64>) {
    let rows = survey_rows(n);
    let df = DataFrame::new(vec![
        Column::new("acadmic_stage".into(), rows.iter().map(|r| r.stage).collect::<Vec<_>>()),
        Column::new("Peer pressure".into(), rows.iter().map(|r| r.peer).collect::<Vec<_>>()),
        Column::new(
            "Academic pressure from your home".into(),
            rows.iter().map(|r| r.home).collect::<Vec<_>>(),
        ),
        Column::new("Study Environment".into(), rows.iter().map(|r| r.environment).collect::<Vec<_>>()),
        Column::new("strategy_used".into(), rows.iter().map(|r| r.strategy).collect::<Vec<_>>()),
        Column::new("bad_habbits".into(), rows.iter().map(|r| r.habit).collect::<Vec<_>>()),
        Column::new(
            "academic_competation".into(),
            rows.iter().map(|r| r.competition).collect::<Vec<_>>(),
        ),
    ])
    .unwrap();
    let target = rows.iter().map(|r| r.stress).collect();
    (df, target)
}

/// Write the survey with raw, whitespace-padded headers as exported by the form tool
pub fn write_survey_csv(path: &Path, n: usize) {
    let mut csv = String::from(
        "\"Your Academic Stage\",\" Peer pressure\",\"Academic pressure from your home \",\
         \"Study Environment\",\"What coping strategy you use as a student?\",\
         \"Do you have any bad habits like smoking, drinking on a daily basis?\",\
         \"What would you rate the academic  competition in your student life\",\
         \"Rate your academic stress index \"\n",
    );
    for r in survey_rows(n) {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            r.stage, r.peer, r.home, r.environment, r.strategy, r.habit, r.competition, r.stress
        ));
    }
    std::fs::write(path, csv).unwrap();
}

pub fn fitted_predictor() -> Predictor {
    let (df, y) = survey_frame(60);
    let mut pipeline = StressPipeline::new(
        PreprocessingConfig::default(),
        LogisticRegression::new().with_c(10.0).with_max_iter(1000),
    );
    pipeline.fit(&df, &y).unwrap();
    Predictor::new(pipeline, FeatureSchema::stress_survey(), LabelMap::bilingual()).unwrap()
}

pub fn test_app(enforce_bounds: bool) -> axum::Router {
    app_for(fitted_predictor(), enforce_bounds)
}

pub fn app_for(predictor: Predictor, enforce_bounds: bool) -> axum::Router {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        model_path: "unused.json".into(),
        enforce_bounds,
    };
    let state = Arc::new(AppState::new(predictor, config));
    create_router(state)
}
