mod common;

use anyhow::Result;
use common::{send, TestApp};
use internship_portal::types::Role;
use reqwest::{Method, StatusCode};
use serde_json::json;

struct Setup {
    app: TestApp,
    student: String,
    mentor: String,
    other_faculty: String,
    internship_id: String,
}

async fn setup() -> Result<Setup> {
    let app = TestApp::spawn().await?;
    let (student_user, student) = app.seed_and_login("asha@college.edu", Role::Student).await?;
    let (mentor_user, mentor) = app.seed_and_login("mentor@college.edu", Role::Faculty).await?;
    let (_, other_faculty) = app.seed_and_login("other@college.edu", Role::Faculty).await?;
    app.assign_mentor(&student_user, &mentor_user).await?;
    let internship_id = app.submit_internship(&student, "Acme").await?;

    Ok(Setup {
        app,
        student,
        mentor,
        other_faculty,
        internship_id,
    })
}

#[tokio::test]
async fn faculty_see_only_their_mentees() -> Result<()> {
    let s = setup().await?;
    let path = format!("/api/faculty/internships/{}", s.internship_id);

    let (status, body) = s.app.get("/api/faculty/students", &s.mentor).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["email"], "asha@college.edu");

    let (status, body) = s.app.get("/api/faculty/internships", &s.mentor).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = s.app.get(&path, &s.other_faculty).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = s.app.get("/api/faculty/internships", &s.other_faculty).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let (status, body) = s.app.get(&path, &s.mentor).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["companyName"], "Acme");
    Ok(())
}

#[tokio::test]
async fn student_detail_includes_internships() -> Result<()> {
    let s = setup().await?;

    let (_, students) = s.app.get("/api/faculty/students", &s.mentor).await?;
    let student_id = students["data"][0]["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = s.app.get(&format!("/api/faculty/students/{}", student_id), &s.mentor).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["student"]["email"], "asha@college.edu");
    assert_eq!(body["data"]["internships"][0]["isActive"], false);

    let (status, _) = s
        .app
        .get(&format!("/api/faculty/students/{}", student_id), &s.other_faculty)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn review_then_lifecycle() -> Result<()> {
    let s = setup().await?;
    let base = format!("/api/faculty/internships/{}", s.internship_id);
    let review = format!("{}/review", base);
    let phase = format!("{}/phase", base);

    // cannot activate before approval
    let (status, _) = s
        .app
        .send_json(Method::PATCH, &phase, &s.mentor, json!({ "internshipPhase": "ACTIVE" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = s
        .app
        .send_json(
            Method::POST,
            &review,
            &s.mentor,
            json!({ "decision": "APPROVED", "remarks": "Verified offer letter" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["reviewStatus"], "APPROVED");
    assert_eq!(body["data"]["reviewRemarks"], "Verified offer letter");
    assert!(body["data"]["reviewedAt"].is_string());

    // a second review is refused
    let (status, _) = s
        .app
        .send_json(Method::POST, &review, &s.mentor, json!({ "decision": "APPROVED" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = s
        .app
        .send_json(Method::PATCH, &phase, &s.mentor, json!({ "internshipPhase": "ACTIVE" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], true);

    // same phase again is not a transition
    let (status, _) = s
        .app
        .send_json(Method::PATCH, &phase, &s.mentor, json!({ "internshipPhase": "ACTIVE" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    // the student marks it completed
    let (status, body) = s
        .app
        .send_json(
            Method::PATCH,
            &format!("/api/student/internships/{}", s.internship_id),
            &s.student,
            json!({ "internshipPhase": "COMPLETED" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["isActive"], false);

    // COMPLETED is terminal
    let (status, _) = s
        .app
        .send_json(Method::PATCH, &phase, &s.mentor, json!({ "internshipPhase": "TERMINATED" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn rejection_needs_remarks_and_terminates() -> Result<()> {
    let s = setup().await?;
    let review = format!("/api/faculty/internships/{}/review", s.internship_id);

    let (status, body) = s
        .app
        .send_json(Method::POST, &review, &s.mentor, json!({ "decision": "REJECTED" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["remarks"].is_string());

    let (status, body) = s
        .app
        .send_json(
            Method::POST,
            &review,
            &s.mentor,
            json!({ "decision": "REJECTED", "reviewRemarks": "Company could not be verified" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reviewStatus"], "REJECTED");
    assert_eq!(body["data"]["internshipPhase"], "TERMINATED");

    // other faculty cannot review it at all
    let (status, _) = s
        .app
        .send_json(Method::POST, &review, &s.other_faculty, json!({ "decision": "APPROVED" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_filters_and_dashboard() -> Result<()> {
    let s = setup().await?;
    s.app.submit_internship(&s.student, "Globex").await?;

    let (_, body) = s.app.get("/api/faculty/internships?reviewStatus=PENDING&limit=1", &s.mentor).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (_, body) = s.app.get("/api/faculty/internships?phase=ACTIVE", &s.mentor).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let (status, _) = s.app.get("/api/faculty/internships?phase=PAUSED", &s.mentor).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = s.app.get("/api/faculty/dashboard", &s.mentor).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["menteeCount"], 1);
    assert_eq!(body["data"]["pendingReviews"], 2);
    assert_eq!(body["data"]["internships"]["byPhase"]["NOT_STARTED"], 2);

    let (status, body) = send(s.app.request(
        Method::GET,
        &format!("/api/faculty/internships/{}/documents", s.internship_id),
        Some(&s.mentor),
    ))
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    Ok(())
}
