use super::{or_dash, tools::*};
use crate::{
    controller::{
        course::{CourseInfo, CoursePatch},
        enrollment::EnrollmentDetail,
        lecture::LecturePatch,
    },
    entity::lecture,
};

pub(super) const COURSE_HEADERS: &[&str] = &["ID", "Name", "Description", "Instructor"];
pub(super) const ENROLLMENT_HEADERS: &[&str] =
    &["ID", "Learner", "Course", "Enrolled At", "Status", "Progress"];

impl From<CourseInfo> for Row {
    fn from(value: CourseInfo) -> Self {
        Row(vec![
            value.id.to_string(),
            value.name,
            or_dash(value.description),
            or_dash(value.instructor_name),
        ])
    }
}

impl From<lecture::Model> for Row {
    fn from(value: lecture::Model) -> Self {
        Row(vec![value.id.to_string(), value.title, or_dash(value.content)])
    }
}

impl From<EnrollmentDetail> for Row {
    fn from(value: EnrollmentDetail) -> Self {
        Row(vec![
            value.id.to_string(),
            value.learner_name,
            value.course_name,
            display(&value.enrolled_at),
            value.status.to_string(),
            format!("{}%", value.progress),
        ])
    }
}

/// Course administration, admin only
pub(super) async fn manage<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    loop {
        let choice = console.menu(
            "Manage Courses",
            &[
                "List courses",
                "Add course",
                "Update course",
                "Delete course",
                "Manage lectures",
                "Back",
            ],
        )?;
        let result = match choice {
            0 => list(app, console).await,
            1 => add(app, console).await,
            2 => update(app, console).await,
            3 => delete(app, console).await,
            4 => {
                let id = console.input("Course ID: ")?;
                lectures(app, console, id).await
            }
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

async fn list<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let courses = app.courses.list().await?;
    console.table(COURSE_HEADERS, courses)
}

async fn add<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let name = console.required("Course name: ")?;
    let description = console.optional("Description (optional): ")?;
    let instructor_id = console.optional_input("Instructor ID (optional): ")?;

    let id = app.courses.add(&name, description, instructor_id).await?;
    console.message(format!("Course added with ID {}.", id))
}

async fn update<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let id = console.input("Course ID: ")?;
    let current = app.courses.get(id).await?;
    console.message(format!("Editing \"{}\", leave a field empty to keep it.", current.name))?;

    let patch = CoursePatch {
        name: console.optional("New name: ")?,
        description: console.optional("New description: ")?,
        instructor_id: console.optional_input("New instructor ID: ")?,
    };
    app.courses.update(id, patch).await?;
    console.message("Course updated.")
}

async fn delete<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let id = console.input("Course ID: ")?;
    let current = app.courses.get(id).await?;
    if !console.confirm(&format!(
        "Delete \"{}\" with all its lectures and enrollments?",
        current.name
    ))? {
        return console.message("Cancelled.");
    }
    app.courses.delete(id).await?;
    console.message("Course deleted.")
}

/// Lecture management of one course, shared by admin and instructor
pub(super) async fn lectures<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    course_id: i32,
) -> Result<()> {
    let course = app.courses.get(course_id).await?;
    let title = format!("Lectures of {}", course.name);
    loop {
        let choice = console.menu(
            &title,
            &[
                "List lectures",
                "Add lecture",
                "Update lecture",
                "Delete lecture",
                "Back",
            ],
        )?;
        let result = match choice {
            0 => list_lectures(app, console, course_id).await,
            1 => add_lecture(app, console, course_id).await,
            2 => update_lecture(app, console, course_id).await,
            3 => delete_lecture(app, console, course_id).await,
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

/// lecture `id` if it belongs to `course_id`
async fn lecture_of(app: &App, course_id: i32, id: i32) -> Result<lecture::Model> {
    let model = app.lectures.get(id).await?;
    if model.course_id != course_id {
        return Err(Error::NotFound("lecture"));
    }
    Ok(model)
}

async fn list_lectures<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    course_id: i32,
) -> Result<()> {
    let lectures = app.lectures.by_course(course_id).await?;
    console.table(&["ID", "Title", "Content"], lectures)
}

async fn add_lecture<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    course_id: i32,
) -> Result<()> {
    let title = console.required("Lecture title: ")?;
    let content = console.optional("Content (optional): ")?;

    let id = app.lectures.add(course_id, &title, content).await?;
    console.message(format!("Lecture added with ID {}.", id))
}

async fn update_lecture<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    course_id: i32,
) -> Result<()> {
    let id = console.input("Lecture ID: ")?;
    lecture_of(app, course_id, id).await?;

    let patch = LecturePatch {
        title: console.optional("New title: ")?,
        content: console.optional("New content: ")?,
    };
    app.lectures.update(id, patch).await?;
    console.message("Lecture updated.")
}

async fn delete_lecture<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    course_id: i32,
) -> Result<()> {
    let id = console.input("Lecture ID: ")?;
    let model = lecture_of(app, course_id, id).await?;
    if !console.confirm(&format!("Delete lecture \"{}\"?", model.title))? {
        return console.message("Cancelled.");
    }
    app.lectures.delete(id).await?;
    console.message("Lecture deleted.")
}
