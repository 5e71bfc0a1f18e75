use super::{
    admin::PROGRESS_HEADERS,
    change_password,
    course::{COURSE_HEADERS, ENROLLMENT_HEADERS},
    tools::*,
};
use crate::controller::lecture::LectureStatus;

impl From<LectureStatus> for Row {
    fn from(value: LectureStatus) -> Self {
        let viewed = match value.viewed_at {
            Some(at) => display(&at),
            None => "-".to_owned(),
        };
        Row(vec![value.id.to_string(), value.title, viewed])
    }
}

pub(super) async fn portal<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    session: &Session,
) -> Result<()> {
    let learner_id = session.entity_id;
    loop {
        let choice = console.menu(
            "Learner Portal",
            &[
                "My courses",
                "Browse courses",
                "Enroll in a course",
                "Open a course",
                "My progress",
                "Change password",
                "Logout",
            ],
        )?;
        let result = match choice {
            0 => my_courses(app, console, learner_id).await,
            1 => browse(app, console).await,
            2 => enroll(app, console, learner_id).await,
            3 => open(app, console, learner_id).await,
            4 => progress(app, console, learner_id).await,
            5 => change_password(app, console, session).await,
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

async fn my_courses<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    learner_id: i32,
) -> Result<()> {
    let enrollments = app.enrollments.by_learner(learner_id).await?;
    console.table(ENROLLMENT_HEADERS, enrollments)
}

async fn browse<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let courses = app.courses.list().await?;
    console.table(COURSE_HEADERS, courses)
}

async fn enroll<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    learner_id: i32,
) -> Result<()> {
    let course_id = console.input("Course ID: ")?;
    app.enrollments.enroll(learner_id, course_id).await?;
    console.message("Enrolled successfully.")
}

/// Browse the lectures of an enrolled course
async fn open<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    learner_id: i32,
) -> Result<()> {
    let course_id = console.input("Course ID: ")?;
    let course = app.courses.get(course_id).await?;
    if app.enrollments.find(learner_id, course_id).await?.is_none() {
        return Err(Error::NotEnrolled);
    }

    loop {
        let lectures = app.lectures.with_view_status(learner_id, course_id).await?;
        console.message(format!("\n{}", course.name))?;
        console.table(&["ID", "Title", "Viewed At"], lectures)?;

        match console.menu(&course.name, &["View lecture", "Back"])? {
            0 => {
                let result = view(app, console, learner_id, course_id).await;
                recover(console, result)?;
            }
            _ => return Ok(()),
        }
    }
}

/// Show a lecture, the first view counts toward progress
async fn view<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    learner_id: i32,
    course_id: i32,
) -> Result<()> {
    let id = console.input("Lecture ID: ")?;
    let lecture = app.lectures.get(id).await?;
    if lecture.course_id != course_id {
        return Err(Error::NotFound("lecture"));
    }

    console.message(format!("\n--- {} ---", lecture.title))?;
    console.message(lecture.content.as_deref().unwrap_or("(no content)"))?;

    match app.enrollments.mark_lecture_viewed(learner_id, id).await {
        Ok(progress) => console.message(format!(
            "\nProgress: {}% ({})",
            progress.percentage, progress.status
        )),
        Err(Error::AlreadyViewed) => Ok(()),
        Err(err) => Err(err),
    }
}

async fn progress<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    learner_id: i32,
) -> Result<()> {
    let enrollments = app.enrollments.by_learner(learner_id).await?;

    let mut rows = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let progress = app.enrollments.get_progress(enrollment.id).await?;
        rows.push(Row(vec![
            enrollment.course_name,
            format!("{}/{}", progress.viewed, progress.total),
            progress.status.to_string(),
            format!("{}%", progress.percentage),
        ]));
    }
    let mut headers = PROGRESS_HEADERS.to_vec();
    headers[0] = "Course";
    console.table(&headers, rows)
}
