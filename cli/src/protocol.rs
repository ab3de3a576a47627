//! JSON request/response documents for the `query` command.
//!
//! ```json
//! {"graph_id": "g1", "queries": [
//!   {"paths": {"start": "a", "end": "e"}},
//!   {"cheapest": {"start": "a", "end": "e"}},
//!   {"cycles": {}}
//! ]}
//! ```

use serde::{Deserialize, Serialize, Serializer};

/// Incoming request. Queries stay as raw JSON until dispatch so that
/// unrecognized entries can be skipped individually.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub graph_id: Option<String>,
    #[serde(default)]
    pub queries: Vec<serde_json::Value>,
}

/// Keys that mark an object as a query this protocol understands.
pub const QUERY_KINDS: [&str; 3] = ["paths", "cheapest", "cycles"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Paths(Endpoints),
    Cheapest(Endpoints),
    Cycles(CyclesQuery),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoints {
    pub start: String,
    pub end: String,
}

/// Cycle queries take no parameters; the body is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CyclesQuery {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Paths(PathsAnswer),
    Cheapest(CheapestAnswer),
    Cycles(CyclesAnswer),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathsAnswer {
    pub from: String,
    pub to: String,
    pub paths: Vec<Vec<String>>,
}

/// `path` is the node list, or `false` when there is no path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheapestAnswer {
    pub from: String,
    pub to: String,
    #[serde(serialize_with = "path_or_false")]
    pub path: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CyclesAnswer {
    pub has_cycle: bool,
    pub cycles: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Answers { answers: Vec<Answer> },
    Error { error: String },
}

impl Response {
    pub fn graph_not_found(graph_id: &str) -> Self {
        Self::Error {
            error: format!("Graph with ID '{graph_id}' does not exist"),
        }
    }
}

fn path_or_false<S: Serializer>(path: &Option<Vec<String>>, s: S) -> Result<S::Ok, S::Error> {
    match path {
        Some(nodes) => nodes.serialize(s),
        None => s.serialize_bool(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_queries() {
        let q: Query = serde_json::from_value(json!({"paths": {"start": "a", "end": "e"}})).unwrap();
        assert_eq!(
            q,
            Query::Paths(Endpoints {
                start: "a".into(),
                end: "e".into()
            })
        );

        let q: Query = serde_json::from_value(json!({"cycles": {}})).unwrap();
        assert_eq!(q, Query::Cycles(CyclesQuery {}));
    }

    #[test]
    fn test_request_defaults() {
        let r: Request = serde_json::from_str("{}").unwrap();
        assert!(r.graph_id.is_none());
        assert!(r.queries.is_empty());
    }

    #[test]
    fn test_cheapest_no_path_is_false() {
        let a = Answer::Cheapest(CheapestAnswer {
            from: "a".into(),
            to: "b".into(),
            path: None,
            cost: None,
        });
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            json!({"cheapest": {"from": "a", "to": "b", "path": false}})
        );
    }

    #[test]
    fn test_cheapest_found() {
        let a = Answer::Cheapest(CheapestAnswer {
            from: "a".into(),
            to: "b".into(),
            path: Some(vec!["a".into(), "b".into()]),
            cost: Some(2.5),
        });
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            json!({"cheapest": {"from": "a", "to": "b", "path": ["a", "b"], "cost": 2.5}})
        );
    }

    #[test]
    fn test_error_response_shape() {
        assert_eq!(
            serde_json::to_value(Response::graph_not_found("g9")).unwrap(),
            json!({"error": "Graph with ID 'g9' does not exist"})
        );
    }
}
