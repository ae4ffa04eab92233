//! Recording in-memory connection pool for integration tests.

#![allow(dead_code)]

use sqlcmd::{
    CmdError, CmdResult, Connection, ConnectionSource, DedicatedConnection, Escape, ModifyResult,
    Params, QueryResult, Row,
};
use std::collections::VecDeque;
use std::future::{Future, ready};
use std::sync::{Arc, Mutex};

/// Everything the pool and its connections were asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Query { sql: String, params: Option<Params> },
    Begin,
    Commit,
    Rollback,
    Release,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    results: VecDeque<CmdResult<QueryResult>>,
    failing: Vec<Event>,
}

/// Pool whose connections share one event log and one queue of scripted
/// results. Unscripted statements succeed with an empty modification report.
#[derive(Clone, Default)]
pub struct MockPool {
    state: Arc<Mutex<State>>,
    no_acquire: bool,
}

impl MockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pool that can't hand out dedicated connections.
    pub fn single() -> Self {
        Self {
            no_acquire: true,
            ..Self::default()
        }
    }

    pub fn push_result(&self, result: CmdResult<QueryResult>) {
        self.state.lock().unwrap().results.push_back(result);
    }

    pub fn push_rows(&self, rows: Vec<Row>) {
        self.push_result(Ok(QueryResult::Rows(rows)));
    }

    pub fn push_modified(&self, affected_rows: u64) {
        self.push_result(Ok(QueryResult::Modified(ModifyResult {
            affected_rows,
            ..ModifyResult::default()
        })));
    }

    pub fn push_error(&self, message: &str) {
        self.push_result(Err(CmdError::database(message)));
    }

    /// Make every later `event` step fail after it is recorded.
    fn fail(&self, event: Event) {
        self.state.lock().unwrap().failing.push(event);
    }

    pub fn fail_begin(&self) {
        self.fail(Event::Begin);
    }

    pub fn fail_commit(&self) {
        self.fail(Event::Commit);
    }

    pub fn fail_rollback(&self) {
        self.fail(Event::Rollback);
    }

    pub fn fail_release(&self) {
        self.fail(Event::Release);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn queries(&self) -> Vec<(String, Option<Params>)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Query { sql, params } => Some((sql, params)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }
}

/// Record a transaction step; fails with `"<step> failed"` when scripted to.
fn step(state: &Mutex<State>, event: Event, name: &str) -> CmdResult<()> {
    let mut state = state.lock().unwrap();
    let fail = state.failing.contains(&event);
    state.events.push(event);
    if fail {
        Err(CmdError::database(format!("{name} failed")))
    } else {
        Ok(())
    }
}

fn run_query(state: &Mutex<State>, sql: &str, params: Option<&Params>) -> CmdResult<QueryResult> {
    let mut state = state.lock().unwrap();
    state.events.push(Event::Query {
        sql: sql.to_string(),
        params: params.cloned(),
    });
    state
        .results
        .pop_front()
        .unwrap_or_else(|| Ok(QueryResult::Modified(ModifyResult::default())))
}

impl Escape for MockPool {}

impl Connection for MockPool {
    fn query(
        &self,
        sql: &str,
        params: Option<&Params>,
    ) -> impl Future<Output = CmdResult<QueryResult>> + Send {
        ready(run_query(&self.state, sql, params))
    }
}

impl ConnectionSource for MockPool {
    type Conn = MockConn;

    fn supports_acquire(&self) -> bool {
        !self.no_acquire
    }

    fn acquire(&self) -> impl Future<Output = CmdResult<MockConn>> + Send {
        ready(Ok(MockConn {
            state: Arc::clone(&self.state),
        }))
    }
}

/// A connection checked out of a [`MockPool`].
pub struct MockConn {
    state: Arc<Mutex<State>>,
}

impl Escape for MockConn {}

impl Connection for MockConn {
    fn query(
        &self,
        sql: &str,
        params: Option<&Params>,
    ) -> impl Future<Output = CmdResult<QueryResult>> + Send {
        ready(run_query(&self.state, sql, params))
    }
}

impl DedicatedConnection for MockConn {
    fn begin_transaction(&self) -> impl Future<Output = CmdResult<()>> + Send {
        ready(step(&self.state, Event::Begin, "begin"))
    }

    fn commit(&self) -> impl Future<Output = CmdResult<()>> + Send {
        ready(step(&self.state, Event::Commit, "commit"))
    }

    fn rollback(&self) -> impl Future<Output = CmdResult<()>> + Send {
        ready(step(&self.state, Event::Rollback, "rollback"))
    }

    fn release(&self) -> CmdResult<()> {
        step(&self.state, Event::Release, "release")
    }
}
