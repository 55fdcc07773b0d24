// src/survey/error_model/pipeline.rs

use super::{ErrorStage, FalseBottom};
use crate::math::probability::SeedResource;
use crate::math::types::*;
use crate::survey::error::SurveyResult;
use bevy::log::debug;
use std::fmt;

/// Runs `vector` through `stages` in order, each output feeding the next stage.
pub fn run_pipeline(stages: &mut [ErrorStage], vector: Point3D, seed: Option<u64>) -> Point3D {
    stages
        .iter_mut()
        .fold(vector, |current, stage| stage.eval(current, seed))
}

/// Ordered list of error stages. The order is the configured order.
#[derive(Debug, Clone, Default)]
pub struct ErrorPipeline {
    stages: Vec<ErrorStage>,
}

impl ErrorPipeline {
    pub fn new(stages: Vec<ErrorStage>) -> Self {
        Self { stages }
    }

    /// Builds the pipeline from `<kind>@<param>` strings, failing on the first bad one.
    pub fn from_specs<I, S>(specs: I) -> SurveyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stages = specs
            .into_iter()
            .map(|spec| ErrorStage::from_spec(spec.as_ref()))
            .collect::<SurveyResult<Vec<_>>>()?;
        Ok(Self::new(stages))
    }

    /// Reseeds every stage from the master seed; stage `i` uses stream `i`.
    pub fn with_seed(mut self, seed: &SeedResource) -> Self {
        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.reseed(seed.derive(i as u64));
        }
        self
    }

    /// Places every false bottom footprint inside `bounds`.
    pub fn init_footprints(&mut self, bounds: Bounds2D) {
        for stage in &mut self.stages {
            if let ErrorStage::FalseBottom(false_bottom) = stage {
                false_bottom.init_footprint(bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y);
            }
        }
        debug!("Initialized false bottom footprints within {}", bounds);
    }

    pub fn run(&mut self, vector: Point3D, seed: Option<u64>) -> Point3D {
        run_pipeline(&mut self.stages, vector, seed)
    }

    pub fn stages(&self) -> &[ErrorStage] {
        &self.stages
    }

    pub fn false_bottoms(&self) -> impl Iterator<Item = &FalseBottom> {
        self.stages.iter().filter_map(|stage| match stage {
            ErrorStage::FalseBottom(false_bottom) => Some(false_bottom),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for ErrorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stages.is_empty() {
            return write!(f, "none");
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::error_model::Dropout;

    fn footprint_center(pipeline: &ErrorPipeline) -> Point2D {
        let corners = pipeline.false_bottoms().next().unwrap().footprint_corners().unwrap();
        (corners[0] + corners[3]) / 2.0
    }

    fn bounds() -> Bounds2D {
        Bounds2D::new(Point2D::new(-10.0, -10.0), Point2D::new(10.0, 10.0)).unwrap()
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let mut pipeline = ErrorPipeline::default();
        let v = Point3D::new(1.0, -2.0, -33.0);
        assert_eq!(pipeline.run(v, Some(3)), v);
        assert_eq!(pipeline.run(v, None), v);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_stages_run_in_configured_order() {
        let false_bottom = || ErrorStage::FalseBottom(FalseBottom::new(10.0, Some(1)).unwrap());
        let always_drop = || ErrorStage::Dropout(Dropout::new(1.0).unwrap());

        let mut fb_first = ErrorPipeline::new(vec![false_bottom(), always_drop()]);
        let mut drop_first = ErrorPipeline::new(vec![always_drop(), false_bottom()]);
        fb_first.init_footprints(bounds());
        drop_first.init_footprints(bounds());

        let center = footprint_center(&fb_first);
        let v = center.extend(20.0);

        assert_eq!(fb_first.run(v, None).z, 0.0);
        assert_eq!(drop_first.run(v, None).z, 0.0);

        // the cache records what reached the stage
        assert_eq!(fb_first.false_bottoms().next().unwrap().cached_depth(), Some(10.0));
        assert_eq!(drop_first.false_bottoms().next().unwrap().cached_depth(), Some(0.0));
    }

    #[test]
    fn test_master_seed_makes_runs_reproducible() {
        let specs = ["noise@0.5", "drop@0.5", "fb@12"];
        let seed = SeedResource::from_seed(2024);
        let mut a = ErrorPipeline::from_specs(specs).unwrap().with_seed(&seed);
        let mut b = ErrorPipeline::from_specs(specs).unwrap().with_seed(&seed);
        a.init_footprints(bounds());
        b.init_footprints(bounds());

        assert_eq!(
            a.false_bottoms().next().unwrap().footprint_corners(),
            b.false_bottoms().next().unwrap().footprint_corners()
        );
        for i in 0..50 {
            let v = Point3D::new(i as f64 * 0.3 - 7.0, 0.5, -20.0 - i as f64);
            assert_eq!(a.run(v, None), b.run(v, None));
        }
    }

    #[test]
    fn test_from_specs_reports_bad_entry() {
        assert!(ErrorPipeline::from_specs(["noise@0.1", "noise@7"]).is_err());
        let pipeline = ErrorPipeline::from_specs(["noise@0.1", "drop@0.2:0.05"]).unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.to_string(), "noise@0.1, drop@0.2:0.05");
        assert_eq!(ErrorPipeline::default().to_string(), "none");
    }
}
