use super::{
    change_password,
    course::{self, ENROLLMENT_HEADERS},
    or_dash,
    tools::*,
};
use crate::controller::{
    audit::LogEntry,
    enrollment::Progress,
    instructor::{InstructorInfo, InstructorPatch},
    learner::{LearnerInfo, LearnerPatch},
    report::{ActiveCourse, CourseOverview, Workload},
};

impl From<LearnerInfo> for Row {
    fn from(value: LearnerInfo) -> Self {
        Row(vec![
            value.id.to_string(),
            value.name,
            value.email,
            or_dash(value.phone),
        ])
    }
}

impl From<InstructorInfo> for Row {
    fn from(value: InstructorInfo) -> Self {
        Row(vec![
            value.id.to_string(),
            value.name,
            value.email,
            or_dash(value.expertise),
        ])
    }
}

impl From<LogEntry> for Row {
    fn from(value: LogEntry) -> Self {
        Row(vec![
            value.id.to_string(),
            value.enrollment_id.to_string(),
            or_dash(value.learner_name),
            or_dash(value.course_name),
            display(&value.log_time),
            value.action,
        ])
    }
}

impl From<Workload> for Row {
    fn from(value: Workload) -> Self {
        Row(vec![
            value.instructor_id.to_string(),
            value.name,
            value.course_count.to_string(),
        ])
    }
}

impl From<ActiveCourse> for Row {
    fn from(value: ActiveCourse) -> Self {
        Row(vec![
            value.course_id.to_string(),
            value.name,
            value.enrollment_count.to_string(),
        ])
    }
}

impl From<CourseOverview> for Row {
    fn from(value: CourseOverview) -> Self {
        Row(vec![
            value.course_id.to_string(),
            value.name,
            or_dash(value.instructor_name),
            value.lecture_count.to_string(),
            value.enrollment_count.to_string(),
        ])
    }
}

impl From<Progress> for Row {
    fn from(value: Progress) -> Self {
        Row(vec![
            value.enrollment_id.to_string(),
            format!("{}/{}", value.viewed, value.total),
            value.status.to_string(),
            format!("{}%", value.percentage),
        ])
    }
}

pub(super) const PROGRESS_HEADERS: &[&str] = &["Enrollment", "Viewed", "Status", "Progress"];

pub(super) async fn panel<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    session: &Session,
) -> Result<()> {
    loop {
        let choice = console.menu(
            "Admin Panel",
            &[
                "Manage learners",
                "Manage instructors",
                "Manage courses",
                "Manage enrollments",
                "Reports",
                "Change password",
                "Logout",
            ],
        )?;
        let result = match choice {
            0 => learners(app, console).await,
            1 => instructors(app, console).await,
            2 => course::manage(app, console).await,
            3 => enrollments(app, console).await,
            4 => reports(app, console).await,
            5 => change_password(app, console, session).await,
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

async fn learners<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    loop {
        let choice = console.menu(
            "Manage Learners",
            &[
                "List learners",
                "Add learner",
                "Update learner",
                "Delete learner",
                "Back",
            ],
        )?;
        let result = match choice {
            0 => list_learners(app, console).await,
            1 => add_learner(app, console).await,
            2 => update_learner(app, console).await,
            3 => delete_learner(app, console).await,
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

async fn list_learners<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let learners = app.learners.list().await?;
    console.table(&["ID", "Name", "Email", "Phone"], learners)
}

async fn add_learner<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let name = console.required("Name: ")?;
    let email = console.required("Email: ")?;
    let password = console.required("Password: ")?;
    let phone = console.optional("Phone (optional): ")?;

    let id = app.learners.add(&name, &email, &password, phone).await?;
    console.message(format!("Learner added with ID {}.", id))
}

async fn update_learner<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let id = console.input("Learner ID: ")?;
    let current = app.learners.get(id).await?;
    console.message(format!("Editing {}, leave a field empty to keep it.", current.name))?;

    let patch = LearnerPatch {
        name: console.optional("New name: ")?,
        email: console.optional("New email: ")?,
        phone: console.optional("New phone: ")?,
    };
    app.learners.update(id, patch).await?;
    console.message("Learner updated.")
}

async fn delete_learner<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let id = console.input("Learner ID: ")?;
    let current = app.learners.get(id).await?;
    if !console.confirm(&format!(
        "Delete {} with all enrollments and lecture views?",
        current.name
    ))? {
        return console.message("Cancelled.");
    }
    app.learners.delete(id).await?;
    console.message("Learner deleted.")
}

async fn instructors<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    loop {
        let choice = console.menu(
            "Manage Instructors",
            &[
                "List instructors",
                "Add instructor",
                "Update instructor",
                "Delete instructor",
                "Back",
            ],
        )?;
        let result = match choice {
            0 => list_instructors(app, console).await,
            1 => add_instructor(app, console).await,
            2 => update_instructor(app, console).await,
            3 => delete_instructor(app, console).await,
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

async fn list_instructors<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let instructors = app.instructors.list().await?;
    console.table(&["ID", "Name", "Email", "Expertise"], instructors)
}

async fn add_instructor<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let name = console.required("Name: ")?;
    let email = console.required("Email: ")?;
    let password = console.required("Password: ")?;
    let expertise = console.optional("Expertise (optional): ")?;

    let id = app
        .instructors
        .add(&name, &email, &password, expertise)
        .await?;
    console.message(format!("Instructor added with ID {}.", id))
}

async fn update_instructor<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let id = console.input("Instructor ID: ")?;
    let current = app.instructors.get(id).await?;
    console.message(format!("Editing {}, leave a field empty to keep it.", current.name))?;

    let patch = InstructorPatch {
        name: console.optional("New name: ")?,
        email: console.optional("New email: ")?,
        expertise: console.optional("New expertise: ")?,
    };
    app.instructors.update(id, patch).await?;
    console.message("Instructor updated.")
}

async fn delete_instructor<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let id = console.input("Instructor ID: ")?;
    let current = app.instructors.get(id).await?;
    if !console.confirm(&format!(
        "Delete {}? Their courses stay without instructor.",
        current.name
    ))? {
        return console.message("Cancelled.");
    }
    app.instructors.delete(id).await?;
    console.message("Instructor deleted.")
}

async fn enrollments<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    loop {
        let choice = console.menu(
            "Manage Enrollments",
            &[
                "List enrollments",
                "Enroll learner",
                "Show progress",
                "Enrollment log",
                "Back",
            ],
        )?;
        let result = match choice {
            0 => list_enrollments(app, console).await,
            1 => enroll(app, console).await,
            2 => progress(app, console).await,
            3 => log(app, console).await,
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

async fn list_enrollments<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let enrollments = app.enrollments.all().await?;
    console.table(ENROLLMENT_HEADERS, enrollments)
}

async fn enroll<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let learner_id = console.input("Learner ID: ")?;
    let course_id = console.input("Course ID: ")?;

    let id = app.enrollments.enroll(learner_id, course_id).await?;
    console.message(format!("Enrolled with enrollment ID {}.", id))
}

async fn progress<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let id = console.input("Enrollment ID: ")?;
    let progress = app.enrollments.get_progress(id).await?;
    console.table(PROGRESS_HEADERS, [progress])
}

async fn log<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let id = console.optional_input("Enrollment ID (empty for all): ")?;
    let entries = match id {
        Some(id) => app.audit.by_enrollment(id).await?,
        None => app.audit.list().await?,
    };
    console.table(
        &["ID", "Enrollment", "Learner", "Course", "Time", "Action"],
        entries,
    )
}

async fn reports<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    loop {
        let choice = console.menu(
            "Reports",
            &[
                "Instructor workload",
                "Course completion summary",
                "Active courses",
                "Course overview",
                "Learner count",
                "Back",
            ],
        )?;
        let result = match choice {
            0 => workload(app, console).await,
            1 => completion(app, console).await,
            2 => active(app, console).await,
            3 => overview(app, console).await,
            4 => learner_count(app, console).await,
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

async fn workload<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let rows = app.reports.instructor_workload().await?;
    console.table(&["ID", "Instructor", "Courses"], rows)
}

async fn completion<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let id = console.input("Course ID: ")?;
    let rows = app.reports.course_completion_summary(id).await?;
    console.table(ENROLLMENT_HEADERS, rows)
}

async fn active<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let rows = app.reports.active_courses().await?;
    console.table(&["ID", "Course", "Enrollments"], rows)
}

async fn overview<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let rows = app.reports.course_overview().await?;
    console.table(
        &["ID", "Course", "Instructor", "Lectures", "Enrollments"],
        rows,
    )
}

async fn learner_count<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<()> {
    let count = app.reports.learner_count().await?;
    console.message(format!("Registered learners: {}", count))
}
