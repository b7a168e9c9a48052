use std::sync::Arc;

use uuid::Uuid;

use config::PipelineConfig;
use errors::*;
use mapper::Map;
use reducer::Reduce;

/// `Job` bundles the user's `Map` and `Reduce` implementations with the configuration of a run.
///
/// Use the `JobBuilder` to create one and then call `run`.
pub struct Job<M, R>
where
    M: Map,
    R: Reduce<M::Value>,
{
    pub(crate) id: String,
    pub(crate) mapper: Arc<M>,
    pub(crate) reducer: R,
    pub(crate) config: PipelineConfig,
}

impl<M, R> Job<M, R>
where
    M: Map,
    R: Reduce<M::Value>,
{
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

/// `JobBuilder` is used to create a `Job`.
pub struct JobBuilder<M, R> {
    mapper: Option<M>,
    reducer: Option<R>,
    config: PipelineConfig,
}

impl<M, R> Default for JobBuilder<M, R> {
    fn default() -> JobBuilder<M, R> {
        JobBuilder {
            mapper: None,
            reducer: None,
            config: PipelineConfig::default(),
        }
    }
}

impl<M, R> JobBuilder<M, R>
where
    M: Map,
    R: Reduce<M::Value>,
{
    pub fn new() -> JobBuilder<M, R> {
        Default::default()
    }

    pub fn mapper(mut self, mapper: M) -> JobBuilder<M, R> {
        self.mapper = Some(mapper);
        self
    }

    pub fn reducer(mut self, reducer: R) -> JobBuilder<M, R> {
        self.reducer = Some(reducer);
        self
    }

    pub fn config(mut self, config: PipelineConfig) -> JobBuilder<M, R> {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Job<M, R>> {
        let mapper = self.mapper
            .chain_err(|| "Error building Job: No Mapper provided")?;
        let reducer = self.reducer
            .chain_err(|| "Error building Job: No Reducer provided")?;
        self.config
            .validate()
            .chain_err(|| "Error building Job: invalid configuration")?;

        Ok(Job {
            id: Uuid::new_v4().to_string(),
            mapper: Arc::new(mapper),
            reducer,
            config: self.config,
        })
    }
}
