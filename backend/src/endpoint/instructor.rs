use super::{
    change_password,
    course::{self, COURSE_HEADERS, ENROLLMENT_HEADERS},
    tools::*,
};

pub(super) async fn portal<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    session: &Session,
) -> Result<()> {
    let instructor_id = session.entity_id;
    loop {
        let choice = console.menu(
            "Instructor Portal",
            &[
                "My courses",
                "Manage lectures",
                "Course roster",
                "Change password",
                "Logout",
            ],
        )?;
        let result = match choice {
            0 => my_courses(app, console, instructor_id).await,
            1 => lectures(app, console, instructor_id).await,
            2 => roster(app, console, instructor_id).await,
            3 => change_password(app, console, session).await,
            _ => return Ok(()),
        };
        recover(console, result)?;
    }
}

/// course id read from input, only courses taught by the instructor
async fn owned_course<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    instructor_id: i32,
) -> Result<i32> {
    let course_id = console.input("Course ID: ")?;
    if !app.courses.owned_by(course_id, instructor_id).await? {
        return Err(Error::NotFound("course"));
    }
    Ok(course_id)
}

async fn my_courses<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    instructor_id: i32,
) -> Result<()> {
    let courses = app.courses.by_instructor(instructor_id).await?;
    console.table(COURSE_HEADERS, courses)
}

async fn lectures<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    instructor_id: i32,
) -> Result<()> {
    let course_id = owned_course(app, console, instructor_id).await?;
    course::lectures(app, console, course_id).await
}

async fn roster<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    instructor_id: i32,
) -> Result<()> {
    let course_id = owned_course(app, console, instructor_id).await?;
    let rows = app.reports.course_completion_summary(course_id).await?;
    console.table(ENROLLMENT_HEADERS, rows)
}
