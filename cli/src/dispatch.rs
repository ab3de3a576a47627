//! Query dispatcher: one request in, one response out.
//!
//! A request names one graph. The snapshot is loaded once, every query in
//! the request runs against it, and it is dropped when the response is
//! built. An unknown graph short-circuits to an error response before the
//! engine is touched.

use std::io::{Read, Write};

use graph_query_core::{CycleEnumerator, Graph, PathFinder};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::protocol::{
    Answer, CheapestAnswer, CyclesAnswer, Endpoints, PathsAnswer, Query, Request, Response,
    QUERY_KINDS,
};
use crate::store::{self, GraphStore};

pub struct Dispatcher<'a, S: GraphStore + ?Sized> {
    store: &'a S,
    settings: &'a Settings,
}

impl<'a, S: GraphStore + ?Sized> Dispatcher<'a, S> {
    pub fn new(store: &'a S, settings: &'a Settings) -> Self {
        Self { store, settings }
    }

    /// Read a request from `input`, write the pretty-printed response and a
    /// trailing newline to `output`.
    pub fn run<R: Read, W: Write>(&self, input: R, mut output: W) -> Result<Response> {
        let request: Request = serde_json::from_reader(input)?;
        let response = self.process(&request)?;
        serde_json::to_writer_pretty(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        Ok(response)
    }

    pub fn process(&self, request: &Request) -> Result<Response> {
        let graph_id = request
            .graph_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(Error::MissingGraphId)?;

        let Some(graph) = store::load_snapshot(self.store, graph_id, self.settings)? else {
            return Ok(Response::graph_not_found(graph_id));
        };

        let queries = parse_queries(&request.queries)?;

        let answers = Session::new(&graph).answer_all(&queries);
        Ok(Response::Answers { answers })
    }
}

/// Parse raw query objects. The first known key of an object (in
/// `QUERY_KINDS` order) selects the query and must be well-formed; other
/// keys are ignored. Objects with no known key are skipped.
fn parse_queries(raw: &[serde_json::Value]) -> Result<Vec<Query>> {
    let mut queries = Vec::with_capacity(raw.len());
    for (index, value) in raw.iter().enumerate() {
        let Some((kind, body)) = known_kind(value) else {
            warn!(index, query = %value, "skipping unrecognized query");
            continue;
        };
        let mut tagged = serde_json::Map::with_capacity(1);
        tagged.insert(kind.to_string(), body.clone());
        let query = serde_json::from_value::<Query>(serde_json::Value::Object(tagged))
            .map_err(|source| Error::InvalidQuery { index, source })?;
        queries.push(query);
    }
    Ok(queries)
}

fn known_kind(value: &serde_json::Value) -> Option<(&'static str, &serde_json::Value)> {
    let obj = value.as_object()?;
    QUERY_KINDS
        .iter()
        .find_map(|&kind| obj.get(kind).map(|body| (kind, body)))
}

/// Engine handles for one snapshot.
struct Session<'g> {
    paths: PathFinder<'g>,
    cycles: Option<CycleEnumerator<'g>>,
}

impl<'g> Session<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            paths: PathFinder::new(graph),
            cycles: None,
        }
    }

    fn answer_all(mut self, queries: &[Query]) -> Vec<Answer> {
        queries.iter().map(|q| self.answer(q)).collect()
    }

    fn answer(&mut self, query: &Query) -> Answer {
        match query {
            Query::Paths(Endpoints { start, end }) => {
                let paths = self.paths.find_all_simple_paths(start, end);
                debug!(start = %start, end = %end, count = paths.len(), "answered paths query");
                Answer::Paths(PathsAnswer {
                    from: start.clone(),
                    to: end.clone(),
                    paths,
                })
            }
            Query::Cheapest(Endpoints { start, end }) => {
                let best = self.paths.find_cheapest_path(start, end);
                debug!(start = %start, end = %end, found = best.is_some(), "answered cheapest query");
                let (path, cost) = match best {
                    Some(b) => (Some(b.nodes), Some(b.cost)),
                    None => (None, None),
                };
                Answer::Cheapest(CheapestAnswer {
                    from: start.clone(),
                    to: end.clone(),
                    path,
                    cost,
                })
            }
            Query::Cycles(_) => {
                let graph = self.paths.graph();
                let enumerator = self
                    .cycles
                    .get_or_insert_with(|| CycleEnumerator::new(graph));
                let cycles = enumerator.find_cycles();
                debug!(count = cycles.len(), "answered cycles query");
                Answer::Cycles(CyclesAnswer {
                    has_cycle: !cycles.is_empty(),
                    cycles,
                })
            }
        }
    }
}
