//! Lessons and weekly timetables against a mock API.

mod support;

use chrono::NaiveDate;
use httpmock::prelude::*;
use librus_sdk::{ClientError, LibrusClient, TimetableEntry};
use serde_json::{Value, json};
use support::{
    EMAIL, INITIAL_TOKEN, PASSWORD, bearer, category, color, config_for, grade, mount_login,
    reference, subject, user,
};

async fn logged_in(server: &MockServer) -> LibrusClient {
    mount_login(server, INITIAL_TOKEN);
    let client = LibrusClient::with_config(config_for(server)).unwrap();
    client.login(EMAIL, PASSWORD).await.unwrap();
    client
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 10, d).unwrap()
}

fn entry(lesson: u64, lesson_no: &str, from: &str, to: &str) -> Value {
    json!({
        "Lesson": reference("Lessons", lesson),
        "Subject": reference("Subjects", 20),
        "Teacher": reference("Users", 10),
        "LessonNo": lesson_no,
        "HourFrom": from,
        "HourTo": to,
        "IsCanceled": false,
        "IsSubstitutionClass": false
    })
}

fn week_body() -> Value {
    json!({"Timetable": {
        "2022-10-03": [[], [entry(300, "1", "08:00", "08:45")], []],
        "2022-10-05": [[entry(301, "0", "07:10", "07:55")], []]
    }})
}

#[tokio::test]
async fn week_is_requested_by_its_monday() {
    let server = MockServer::start();
    let client = logged_in(&server).await;

    let timetable = server.mock(|when, then| {
        when.method(GET)
            .path("/3.0/Timetables")
            .query_param("weekStart", "2022-10-03")
            .header("authorization", bearer(INITIAL_TOKEN));
        then.status(200).json_body(week_body());
    });

    // a Wednesday
    let week = client.timetables().fetch_week(day(5)).await.unwrap();

    timetable.assert_calls(1);
    assert_eq!(week.week_start, day(3));
    assert_eq!(week.days.len(), 2);

    let monday = week.day(day(3));
    assert_eq!(monday.len(), 3);
    assert!(monday[0].is_empty());
    let first: &TimetableEntry = &monday[1][0];
    assert_eq!(*first.lesson.id(), 300);
    assert_eq!(first.hour_from, "08:00");
    assert!(week.day(day(4)).is_empty());
}

#[tokio::test]
async fn day_is_taken_from_its_week() {
    let server = MockServer::start();
    let client = logged_in(&server).await;

    let timetable = server.mock(|when, then| {
        when.method(GET)
            .path("/3.0/Timetables")
            .query_param("weekStart", "2022-10-03");
        then.status(200).json_body(week_body());
    });

    let wednesday = client.timetables().fetch_day(day(5)).await.unwrap();
    let sunday = client.timetables().fetch_day(day(9)).await.unwrap();

    timetable.assert_calls(2);
    assert_eq!(wednesday.len(), 2);
    assert_eq!(wednesday[0][0].lesson_no, "0");
    assert!(sunday.is_empty());
}

#[tokio::test]
async fn failed_timetable_is_request_failed() {
    let server = MockServer::start();
    let client = logged_in(&server).await;

    server.mock(|when, then| {
        when.method(GET).path("/3.0/Timetables");
        then.status(500).body("oops");
    });

    let err = client.timetables().fetch_week(day(5)).await.unwrap_err();

    assert!(
        matches!(err, ClientError::RequestFailed { status: Some(s), .. } if s.as_u16() == 500),
        "got {err}"
    );
}

#[tokio::test]
async fn lesson_references_resolve_on_demand() {
    let server = MockServer::start();
    let client = logged_in(&server).await;

    let lesson = server.mock(|when, then| {
        when.method(GET).path("/3.0/Lessons/300");
        then.status(200).json_body(json!({"Lesson": {
            "Id": 300,
            "Teacher": reference("Users", 10),
            "Subject": reference("Subjects", 20)
        }}));
    });
    let teacher = server.mock(|when, then| {
        when.method(GET).path("/3.0/Users/10");
        then.status(200).json_body(json!({"User": user(10, "Anna")}));
    });
    let subject_mock = server.mock(|when, then| {
        when.method(GET).path("/3.0/Subjects/20");
        then.status(200)
            .json_body(json!({"Subject": subject(20, "Matematyka")}));
    });

    let fetched = client.lessons().fetch(300).await.unwrap();
    teacher.assert_calls(0);
    subject_mock.assert_calls(0);

    assert_eq!(fetched.fetch_teacher(&client).await.unwrap().first_name, "Anna");
    assert_eq!(fetched.fetch_subject(&client).await.unwrap().name, "Matematyka");

    // cached after the first fetch
    client.lessons().fetch(300).await.unwrap();
    lesson.assert_calls(1);
    teacher.assert_calls(1);
}

#[tokio::test]
async fn grade_lesson_is_fetched_on_demand() {
    let server = MockServer::start();
    let client = logged_in(&server).await;

    server.mock(|when, then| {
        when.method(GET).path("/3.0/Grades/1");
        then.status(200)
            .json_body(json!({"Grade": grade(1, 5, 10, 11, 20)}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/3.0/Grades/Categories/5");
        then.status(200).json_body(json!({"Category": category(5, 2)}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/3.0/Colors/2");
        then.status(200).json_body(json!({"Color": color(2)}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/3.0/Users/10,11,");
        then.status(200)
            .json_body(json!({"Users": [user(10, "Anna"), user(11, "Jan")]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/3.0/Subjects/20");
        then.status(200)
            .json_body(json!({"Subject": subject(20, "Matematyka")}));
    });
    let lesson = server.mock(|when, then| {
        when.method(GET).path("/3.0/Lessons/300");
        then.status(200).json_body(json!({"Lesson": {
            "Id": 300,
            "Teacher": reference("Users", 10),
            "Subject": reference("Subjects", 20)
        }}));
    });

    let fetched = client.grades().fetch(1).await.unwrap();
    lesson.assert_calls(0);

    let resolved = fetched.fetch_lesson(&client).await.unwrap();
    lesson.assert_calls(1);
    assert_eq!(resolved.id, 300);
}
