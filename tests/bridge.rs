use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

use chrono::NaiveDate;
use payday_tools::ToolError;
use payday_tools::bridge::{
    BridgeSession, CheckAdd, EmployeeListReply, EmployeeRow, ExpenseLine, LedgerBridge, Reply,
    Request, StatusReply, SubmitReply, WageItemListReply, WageItemRow,
};
use payday_tools::directory::EntityDirectory;

/// Runs a single-connection scripted bridge, answering each request with
/// `respond` and reporting every request it saw once the session ends.
fn scripted_bridge(
    respond: fn(&Request) -> Reply,
) -> (String, mpsc::Receiver<Vec<Request>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener bound");
    let addr = listener.local_addr().expect("listener address").to_string();
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("connection accepted");
        let mut requests = Vec::new();
        serve(stream, respond, &mut requests);
        // The receiver may already be gone when a test only cares about the
        // client-side behavior.
        let _ = sender.send(requests);
    });

    (addr, receiver)
}

fn serve(stream: TcpStream, respond: fn(&Request) -> Reply, requests: &mut Vec<Request>) {
    let mut writer = stream.try_clone().expect("stream cloned");
    let reader = BufReader::new(stream);

    for line in reader.lines() {
        let Ok(line) = line else { break };
        let request: Request = serde_json::from_str(&line).expect("request parsed");
        let reply = respond(&request);
        let mut encoded = serde_json::to_string(&reply).expect("reply serialized");
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).expect("reply written");

        let done = matches!(request, Request::Goodbye);
        requests.push(request);
        if done {
            break;
        }
    }
}

fn ok_status() -> StatusReply {
    StatusReply {
        status_code: 0,
        status_message: String::new(),
    }
}

fn respond_healthy(request: &Request) -> Reply {
    match request {
        Request::Hello(_) => Reply::Hello(ok_status()),
        Request::EmployeeQuery => Reply::Employees(EmployeeListReply {
            status_code: 0,
            status_message: String::new(),
            employees: vec![EmployeeRow {
                list_id: "E1".to_string(),
                name: "Doe, John".to_string(),
                first_name: Some("John".to_string()),
                last_name: Some("Doe".to_string()),
                is_active: true,
            }],
        }),
        Request::WageItemQuery => Reply::WageItems(WageItemListReply {
            status_code: 0,
            status_message: String::new(),
            wage_items: vec![WageItemRow {
                list_id: "P1".to_string(),
                name: "Regular Pay".to_string(),
                is_active: true,
            }],
        }),
        Request::CheckAdd(_) | Request::TimeEntryAdd(_) => Reply::Submit(SubmitReply {
            status_code: 0,
            status_message: String::new(),
            txn_id: Some("TXN-1".to_string()),
        }),
        Request::CompanyQuery => Reply::Company(payday_tools::bridge::CompanyReply {
            status_code: 0,
            status_message: String::new(),
            company: None,
        }),
        Request::Goodbye => Reply::Goodbye(ok_status()),
    }
}

fn respond_rejecting_employee_query(request: &Request) -> Reply {
    match request {
        Request::EmployeeQuery => Reply::Employees(EmployeeListReply {
            status_code: 500,
            status_message: "list unavailable".to_string(),
            employees: Vec::new(),
        }),
        other => respond_healthy(other),
    }
}

#[test]
fn session_handshakes_queries_submits_and_says_goodbye() {
    let (addr, requests) = scripted_bridge(respond_healthy);

    let mut session = BridgeSession::connect(&addr).expect("session established");

    let employees = session.list_employees().expect("employees listed");
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].list_id, "E1");

    let reply = session
        .add_check(CheckAdd {
            payee_list_id: "E1".to_string(),
            txn_date: NaiveDate::from_ymd_opt(2025, 6, 13).expect("valid date"),
            is_to_be_printed: true,
            memo: "Earnings: Bonus".to_string(),
            expense_line: ExpenseLine {
                account_list_id: "P1".to_string(),
                amount: 500.0,
                memo: "Bonus for John Doe".to_string(),
            },
        })
        .expect("check submitted");
    assert_eq!(reply.status_code, 0);
    assert_eq!(reply.txn_id.as_deref(), Some("TXN-1"));

    drop(session);

    let seen = requests.recv().expect("request log received");
    assert!(matches!(seen.first(), Some(Request::Hello(_))));
    assert!(matches!(seen.last(), Some(Request::Goodbye)));
}

#[test]
fn rejected_list_queries_surface_as_query_errors() {
    let (addr, _requests) = scripted_bridge(respond_rejecting_employee_query);

    let mut session = BridgeSession::connect(&addr).expect("session established");
    let error = session.list_employees().expect_err("query must fail");
    assert!(matches!(
        error,
        ToolError::Query {
            status_code: 500,
            ..
        }
    ));
}

#[test]
fn directory_load_degrades_a_rejected_listing_to_empty() {
    let (addr, _requests) = scripted_bridge(respond_rejecting_employee_query);

    let mut session = BridgeSession::connect(&addr).expect("session established");
    let directory = EntityDirectory::load(&mut session).expect("directory loaded");

    assert!(directory.employees().is_empty());
    assert_eq!(directory.wage_items().len(), 1);
}
