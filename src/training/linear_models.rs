//! Linear model implementations

use crate::error::{StressError, Result};
use super::lbfgs::{ConvergenceStatus, Lbfgs};
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Multinomial (softmax) logistic regression with L2 penalty on the weights.
///
/// Minimizes the mean cross-entropy plus `||W||^2 / (2 * C * n_samples)`,
/// which has the same minimizer as `C * sum(loss) + ||W||^2 / 2`. Intercepts
/// are not penalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Class labels in ascending order; rows of `coefficients` follow it
    pub classes: Vec<i64>,
    /// Fitted weights, shape (n_classes, n_features)
    pub coefficients: Option<Array2<f64>>,
    /// Fitted intercepts, one per class
    pub intercepts: Option<Array1<f64>>,
    /// Inverse regularization strength
    pub c: f64,
    /// Maximum optimizer iterations
    pub max_iter: usize,
    /// Gradient tolerance
    pub tol: f64,
    /// Correction pairs kept by L-BFGS
    pub history: usize,
    /// Iterations used by the last fit
    pub n_iter: usize,
    /// Whether the last fit reached the tolerance
    pub converged: bool,
    /// Objective value at the solution
    pub final_loss: Option<f64>,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create a new logistic regression model
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            coefficients: None,
            intercepts: None,
            c: 1.0,
            max_iter: 100,
            tol: 1e-4,
            history: 10,
            n_iter: 0,
            converged: false,
            final_loss: None,
            is_fitted: false,
        }
    }

    /// Set inverse regularization strength
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set gradient tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Fit the model with L-BFGS
    pub fn fit(&mut self, x: &Array2<f64>, y: &[i64]) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(StressError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(StressError::TrainingError("No samples to fit".to_string()));
        }
        if !self.c.is_finite() || self.c <= 0.0 {
            return Err(StressError::InvalidParameter {
                name: "C".to_string(),
                value: self.c.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(StressError::TrainingError(format!(
                "Need at least two classes, got {:?}",
                classes
            )));
        }
        let n_classes = classes.len();

        // One-hot targets
        let mut targets = Array2::<f64>::zeros((n_samples, n_classes));
        for (i, label) in y.iter().enumerate() {
            // classes is sorted and contains every label
            let k = classes.binary_search(label).unwrap_or_default();
            targets[[i, k]] = 1.0;
        }

        let n_weights = n_classes * n_features;
        let penalty = 1.0 / (self.c * n_samples as f64);

        let objective = |params: &Array1<f64>| {
            let (w, b) = unpack(params, n_classes, n_features);
            let logits = x.dot(&w.t()) + &b;

            let mut loss = 0.0;
            let mut residual = Array2::<f64>::zeros((n_samples, n_classes));
            for (i, row) in logits.axis_iter(Axis(0)).enumerate() {
                let (lse, probs) = log_softmax_row(row);
                let target = targets.row(i);
                let k = target.iter().position(|t| *t == 1.0).unwrap_or(0);
                loss += lse - row[k];
                residual.row_mut(i).assign(&(&probs - &target));
            }
            loss /= n_samples as f64;
            loss += 0.5 * penalty * w.iter().map(|v| v * v).sum::<f64>();

            let grad_w = residual.t().dot(x) / n_samples as f64 + &(penalty * &w);
            let grad_b = residual.sum_axis(Axis(0)) / n_samples as f64;

            let mut grad = Array1::<f64>::zeros(n_weights + n_classes);
            grad.slice_mut(s![..n_weights])
                .assign(&Array1::from_iter(grad_w.iter().copied()));
            grad.slice_mut(s![n_weights..]).assign(&grad_b);
            (loss, grad)
        };

        let optimizer = Lbfgs::new(self.max_iter, self.tol, self.history);
        let result = optimizer.minimize(Array1::zeros(n_weights + n_classes), objective);

        let (w, b) = unpack(&result.solution, n_classes, n_features);
        self.classes = classes;
        self.coefficients = Some(w);
        self.intercepts = Some(b);
        self.n_iter = result.iterations;
        self.converged = result.status == ConvergenceStatus::Converged;
        self.final_loss = Some(result.objective);
        self.is_fitted = true;

        Ok(self)
    }

    /// Raw class scores, shape (n_samples, n_classes)
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (coefficients, intercepts) = match (&self.coefficients, &self.intercepts) {
            (Some(w), Some(b)) if self.is_fitted => (w, b),
            _ => return Err(StressError::ModelNotFitted),
        };

        if x.ncols() != coefficients.ncols() {
            return Err(StressError::ShapeError {
                expected: format!("{} features", coefficients.ncols()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.dot(&coefficients.t()) + intercepts)
    }

    /// Class probabilities, columns ordered like `classes`
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let mut scores = self.decision_function(x)?;
        for mut row in scores.axis_iter_mut(Axis(0)) {
            let (_, probs) = log_softmax_row(row.view());
            row.assign(&probs);
        }
        Ok(scores)
    }

    /// Predict class labels
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<i64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .axis_iter(Axis(0))
            .map(|row| self.classes[argmax(row)])
            .collect())
    }

    /// Get accuracy score
    pub fn score(&self, x: &Array2<f64>, y: &[i64]) -> Result<f64> {
        let y_pred = self.predict(x)?;
        if y.is_empty() {
            return Ok(0.0);
        }

        let correct = y_pred.iter().zip(y.iter()).filter(|(p, a)| p == a).count();
        Ok(correct as f64 / y.len() as f64)
    }
}

fn unpack(params: &Array1<f64>, n_classes: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let n_weights = n_classes * n_features;
    let w = Array2::from_shape_vec(
        (n_classes, n_features),
        params.slice(s![..n_weights]).to_vec(),
    )
    .unwrap_or_else(|_| Array2::zeros((n_classes, n_features)));
    let b = params.slice(s![n_weights..]).to_owned();
    (w, b)
}

/// Log-sum-exp of a row and its softmax
fn log_softmax_row(row: ArrayView1<f64>) -> (f64, Array1<f64>) {
    let max_val = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Array1<f64> = row.mapv(|z| (z - max_val).exp());
    let sum: f64 = exp.sum();
    (max_val + sum.ln(), exp / sum)
}

/// First index of the largest value
fn argmax(row: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, v) in row.iter().enumerate() {
        if *v > row[best] {
            best = i;
        }
    }
    best
}
