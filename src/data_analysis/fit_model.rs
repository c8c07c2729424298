// src/data_analysis/fit_model.rs

//! Fitted-curve models: sums of basis functions with concatenated parameters, and
//! the shared two-channel model whose leading parameters are common to X and Y.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;

use crate::error::{RenderError, RenderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisFunction {
    /// Absorptive resonance `A·d·f / ((f0² − f²)² + (d·f)²)`, params `[A, d, f0]`.
    LorentzX,
    /// Dispersive resonance `A·(f0² − f²) / ((f0² − f²)² + (d·f)²)`, params `[A, d, f0]`.
    LorentzY,
    /// `c`
    Constant,
    /// `c0 + c1·f`
    Linear,
    /// `c0 + c1·f + c2·f²`
    Quadratic,
}

impl BasisFunction {
    pub fn param_count(self) -> usize {
        match self {
            BasisFunction::LorentzX | BasisFunction::LorentzY => 3,
            BasisFunction::Constant => 1,
            BasisFunction::Linear => 2,
            BasisFunction::Quadratic => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BasisFunction::LorentzX => "lorentz-x",
            BasisFunction::LorentzY => "lorentz-y",
            BasisFunction::Constant => "constant",
            BasisFunction::Linear => "linear",
            BasisFunction::Quadratic => "quadratic",
        }
    }

    /// Evaluates at `f`; `p` must hold exactly `param_count()` values.
    pub fn eval(self, f: f64, p: &[f64]) -> f64 {
        match self {
            BasisFunction::LorentzX => {
                let (a, d, f0) = (p[0], p[1], p[2]);
                let detune = f0 * f0 - f * f;
                a * d * f / (detune * detune + (d * f).powi(2))
            }
            BasisFunction::LorentzY => {
                let (a, d, f0) = (p[0], p[1], p[2]);
                let detune = f0 * f0 - f * f;
                a * detune / (detune * detune + (d * f).powi(2))
            }
            BasisFunction::Constant => p[0],
            BasisFunction::Linear => p[0] + p[1] * f,
            BasisFunction::Quadratic => p[0] + p[1] * f + p[2] * f * f,
        }
    }
}

impl fmt::Display for BasisFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BasisFunction {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "lorentz-x" | "lrtzx" => Ok(BasisFunction::LorentzX),
            "lorentz-y" | "lrtzy" => Ok(BasisFunction::LorentzY),
            "constant" | "const" => Ok(BasisFunction::Constant),
            "linear" => Ok(BasisFunction::Linear),
            "quadratic" => Ok(BasisFunction::Quadratic),
            _ => Err(RenderError::UnknownFunction {
                name: s.to_string(),
            }),
        }
    }
}

/// Fold-weighted sum of basis functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    terms: Vec<(BasisFunction, f64)>,
}

impl Model {
    pub fn assemble(funcs: &[BasisFunction], folds: &[f64]) -> RenderResult<Self> {
        if funcs.len() != folds.len() {
            return Err(RenderError::ParamCount {
                what: "model folds",
                expected: funcs.len(),
                got: folds.len(),
            });
        }
        Ok(Model {
            terms: funcs.iter().copied().zip(folds.iter().copied()).collect(),
        })
    }

    /// Model with every fold equal to one.
    pub fn unit(funcs: &[BasisFunction]) -> Self {
        Model {
            terms: funcs.iter().map(|&func| (func, 1.0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn param_size(&self) -> usize {
        self.terms.iter().map(|(func, _)| func.param_count()).sum()
    }

    pub fn eval(&self, x: &Array1<f64>, params: &[f64]) -> RenderResult<Array1<f64>> {
        let expected = self.param_size();
        if params.len() != expected {
            return Err(RenderError::ParamCount {
                what: "model",
                expected,
                got: params.len(),
            });
        }
        Ok(x.mapv(|f| {
            let mut offset = 0;
            let mut total = 0.0;
            for &(func, fold) in &self.terms {
                let n = func.param_count();
                total += fold * func.eval(f, &params[offset..offset + n]);
                offset += n;
            }
            total
        }))
    }
}

/// Two models fitted together whose first `share` parameters are common.
#[derive(Debug, Clone, Copy)]
pub struct SharedModel<'a> {
    first: &'a Model,
    second: &'a Model,
    share: usize,
}

/// Parameters of a shared fit split back per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfoldedParams {
    pub shared: Vec<f64>,
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

impl<'a> SharedModel<'a> {
    pub fn new(first: &'a Model, second: &'a Model, share: usize) -> RenderResult<Self> {
        let available = first.param_size().min(second.param_size());
        if share > available {
            return Err(RenderError::SharedCountUnreachable {
                sharenum: share,
                available,
            });
        }
        Ok(SharedModel {
            first,
            second,
            share,
        })
    }

    pub fn param_size(&self) -> usize {
        self.first.param_size() + self.second.param_size() - self.share
    }

    /// Splits `[shared, rest1, rest2]` into `shared ++ rest1` and `shared ++ rest2`.
    pub fn unfold(&self, popt: &[f64]) -> RenderResult<UnfoldedParams> {
        let expected = self.param_size();
        if popt.len() != expected {
            return Err(RenderError::ParamCount {
                what: "shared model",
                expected,
                got: popt.len(),
            });
        }
        let (shared, rest) = popt.split_at(self.share);
        let (rest1, rest2) = rest.split_at(self.first.param_size() - self.share);
        Ok(UnfoldedParams {
            shared: shared.to_vec(),
            first: [shared, rest1].concat(),
            second: [shared, rest2].concat(),
        })
    }

    /// Both channel outputs on `x`, concatenated.
    pub fn eval(&self, x: &Array1<f64>, popt: &[f64]) -> RenderResult<Array1<f64>> {
        let params = self.unfold(popt)?;
        let out1 = self.first.eval(x, &params.first)?;
        let out2 = self.second.eval(x, &params.second)?;
        Ok(out1.iter().chain(out2.iter()).copied().collect())
    }
}
