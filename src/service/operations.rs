//! The three stored-procedure-backed operations.

use serde::Deserialize;

use crate::backend::ProcedureArgs;

/// A logical downstream operation. Each has its own circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    EventDetail,
    OutageDetail,
    OutageHistory,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::EventDetail,
        Operation::OutageDetail,
        Operation::OutageHistory,
    ];

    /// Name used for breakers, metrics and correlation IDs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::EventDetail => "event-detail",
            Operation::OutageDetail => "outage-detail",
            Operation::OutageHistory => "outage-history",
        }
    }

    pub fn procedure(&self) -> &'static str {
        match self {
            Operation::EventDetail => "GET_EVENT_DETAIL",
            Operation::OutageDetail => "GET_OUTAGE_DETAIL",
            Operation::OutageHistory => "GET_OUTAGE_HISTORY",
        }
    }
}

/// Query parameters accepted by the outage-detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DivisionQuery {
    pub division: Option<String>,
}

/// Optional filters accepted by the outage-history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub division: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub etd_blocking: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub process_id: Option<String>,
    pub qualification: Option<String>,
}

/// Caller-supplied parameters for one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    EventDetail {
        event_id: String,
    },
    OutageDetail {
        account: String,
        division: Option<String>,
    },
    OutageHistory {
        account: String,
        query: HistoryQuery,
    },
}

impl OperationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::EventDetail { .. } => Operation::EventDetail,
            OperationRequest::OutageDetail { .. } => Operation::OutageDetail,
            OperationRequest::OutageHistory { .. } => Operation::OutageHistory,
        }
    }

    /// Procedure arguments, passed through as given.
    pub fn args(&self) -> ProcedureArgs {
        match self {
            OperationRequest::EventDetail { event_id } => ProcedureArgs::new().bind("eventId", event_id.as_str()),
            OperationRequest::OutageDetail { account, division } => ProcedureArgs::new()
                .bind("accountNumber", account.as_str())
                .bind_opt("division", division.clone()),
            OperationRequest::OutageHistory { account, query } => ProcedureArgs::new()
                .bind("accountNumber", account.as_str())
                .bind_opt("division", query.division.clone())
                .bind_opt("startTime", query.start_time.clone())
                .bind_opt("endTime", query.end_time.clone())
                .bind_opt("etdBlocking", query.etd_blocking.clone())
                .bind_opt("limit", query.limit)
                .bind_opt("offset", query.offset)
                .bind_opt("processId", query.process_id.clone())
                .bind_opt("qualification", query.qualification.clone()),
        }
    }
}
