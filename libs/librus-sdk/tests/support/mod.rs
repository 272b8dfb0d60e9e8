//! Mock portal and API shared by the integration tests.

#![allow(dead_code)]

use httpmock::Mock;
use httpmock::prelude::*;
use librus_sdk::{ClientConfig, LibrusClient};
use serde_json::{Value, json};

pub const EMAIL: &str = "parent@example.com";
pub const PASSWORD: &str = "correct horse";
pub const CSRF_TOKEN: &str = "csrf-123";
pub const SESSION_COOKIE: &str = "DZIENNIKSID=sess-1";
pub const ACCOUNT_LOGIN: &str = "1234567u";
pub const INITIAL_TOKEN: &str = "token-initial";
pub const FRESH_TOKEN: &str = "token-fresh";

pub struct LoginMocks<'a> {
    pub landing: Mock<'a>,
    pub action: Mock<'a>,
    pub accounts: Mock<'a>,
    pub me: Mock<'a>,
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::for_testing(&server.base_url())
}

pub fn client_for(server: &MockServer) -> LibrusClient {
    LibrusClient::with_config(config_for(server)).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Mount the portal handshake. The login action only accepts requests that
/// carry the cookie set by the landing page and the scraped CSRF token.
pub fn mount_login<'a>(server: &'a MockServer, token: &str) -> LoginMocks<'a> {
    let landing = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .header("set-cookie", format!("{SESSION_COOKIE}; Path=/"))
            .header("content-type", "text/html")
            .body(format!(
                r#"<!DOCTYPE html><html><head><meta name="csrf-token" content="{CSRF_TOKEN}"></head><body></body></html>"#
            ));
    });

    let action = server.mock(|when, then| {
        when.method(POST)
            .path("/konto-librus/login/action")
            .header("x-csrf-token", CSRF_TOKEN)
            .header("cookie", SESSION_COOKIE)
            .json_body(json!({"email": EMAIL, "password": PASSWORD}));
        then.status(200)
            .json_body(json!({"redirect": "/konto-librus/redirect/dru"}));
    });

    let accounts = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v3/SynergiaAccounts")
            .header("cookie", SESSION_COOKIE);
        then.status(200).json_body(json!({
            "lastModification": 1_664_000_000,
            "accounts": [{
                "id": 1,
                "accountIdentifier": "acc-1",
                "group": "parent",
                "accessToken": token,
                "login": ACCOUNT_LOGIN,
                "studentName": "Jan Kowalski",
                "scopes": "",
                "state": "active"
            }]
        }));
    });

    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/3.0/Me")
            .header("authorization", bearer(token));
        then.status(200).json_body(json!({
            "Me": {
                "Account": {
                    "Id": 1,
                    "UserId": 11,
                    "FirstName": "Ewa",
                    "LastName": "Kowalska",
                    "Email": EMAIL,
                    "GroupId": 5,
                    "IsActive": true,
                    "Login": ACCOUNT_LOGIN,
                    "IsPremium": false,
                    "IsPremiumDemo": false,
                    "ExpiredPremiumDate": 0
                },
                "User": {"FirstName": "Ewa", "LastName": "Kowalska"},
                "Refresh": 0
            }
        }));
    });

    LoginMocks {
        landing,
        action,
        accounts,
        me,
    }
}

pub fn reference(path: &str, id: u64) -> Value {
    json!({"Id": id, "Url": format!("https://api.librus.pl/3.0/{path}/{id}")})
}

pub fn user(id: u64, first_name: &str) -> Value {
    json!({
        "Id": id,
        "AccountID": id + 1000,
        "FirstName": first_name,
        "LastName": "Kowalski",
        "IsEmployee": false
    })
}

pub fn subject(id: u64, name: &str) -> Value {
    json!({
        "Id": id,
        "Name": name,
        "No": 1,
        "Short": "x",
        "IsExtracurricular": false,
        "IsBlockLesson": false
    })
}

pub fn color(id: u64) -> Value {
    json!({"Id": id, "RGB": "4f81bd", "Name": "blue"})
}

pub fn category(id: u64, color_id: u64) -> Value {
    json!({
        "Id": id,
        "Color": reference("Colors", color_id),
        "Name": "Sprawdzian",
        "AdultsExtramural": false,
        "AdultsDaily": true,
        "Standard": true,
        "IsReadOnly": "false",
        "CountToTheAverage": true,
        "Weight": 3,
        "BlockAnyGrades": false,
        "ObligationToPerform": true
    })
}

pub fn grade(id: u64, category: u64, added_by: u64, student: u64, subject: u64) -> Value {
    json!({
        "Id": id,
        "Lesson": reference("Lessons", 300),
        "Subject": reference("Subjects", subject),
        "Student": reference("Users", student),
        "Category": reference("Grades/Categories", category),
        "AddedBy": reference("Users", added_by),
        "Grade": "5",
        "Date": "2022-10-03",
        "AddDate": "2022-10-03 12:00:00",
        "Semester": 1,
        "IsConstituent": true,
        "IsSemester": false,
        "IsSemesterProposition": false,
        "IsFinal": false,
        "IsFinalProposition": false
    })
}
