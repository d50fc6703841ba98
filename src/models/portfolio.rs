//! Portfolio: the public site's faculties, departments, teachers, offices, offers,
//! admissions and enquiries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::{
    repository::{Column, Direction, ListFilter, OrderBy, Table},
    schema::{Resource, ResponseStyle, Upload, allow_list, date, date_time, form, tri_state},
};

const NEWEST_FIRST: Option<OrderBy> = Some(OrderBy {
    column: "created_at",
    direction: Direction::Desc,
});

const BY_INDEX: Option<OrderBy> = Some(OrderBy {
    column: "index",
    direction: Direction::Asc,
});

fn query_str<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query.get(key).map(String::as_str)
}

// --- Department ---

pub static DEPARTMENT_TABLE: Table = Table {
    name: "portfolio.department",
    select: r#"
        SELECT
            department.id,
            department.uuid,
            department.name,
            department.short_name,
            department.page_link,
            department."index",
            to_char(department.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(department.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            department.created_by,
            creator.name AS created_by_name,
            department.remarks
        FROM portfolio.department
        LEFT JOIN hr.users creator ON department.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("name"),
        Column::text("short_name"),
        Column::text("page_link"),
        Column::integer("index"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: BY_INDEX,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Department {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub short_name: Option<String>,
    pub page_link: Option<String>,
    pub index: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DepartmentPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub short_name: Option<String>,
    pub page_link: Option<String>,
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub index: Option<i64>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for Department {
    type Payload = DepartmentPayload;
    const NAME: &'static str = "portfolio department";
    const PATH: &'static str = "/portfolio/department";
    const TABLE: &'static Table = &DEPARTMENT_TABLE;

    /// `access=cse,eee` restricts to those short names.
    fn list_filter(query: &HashMap<String, String>) -> ListFilter {
        ListFilter::default().one_of("short_name", allow_list(query_str(query, "access")))
    }
}

// --- Department teachers ---

pub static DEPARTMENT_TEACHERS_TABLE: Table = Table {
    name: "portfolio.department_teachers",
    select: r#"
        SELECT
            dt.id,
            dt.uuid,
            dt.department_uuid,
            department.name AS department_name,
            department.short_name AS department_short_name,
            department.page_link,
            dt.teacher_uuid,
            teacher.name AS teacher_name,
            teacher.image AS teacher_image,
            teacher.office,
            dt.teacher_designation,
            dt.teacher_email,
            dt.teacher_phone,
            dt.department_head,
            dt.education,
            dt.publication,
            dt.journal,
            to_char(dt.appointment_date, 'YYYY-MM-DD') AS appointment_date,
            to_char(dt.resign_date, 'YYYY-MM-DD') AS resign_date,
            dt.about,
            dt.department_head_message,
            dt.teacher_initial,
            dt."index",
            dt.status,
            to_char(dt.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(dt.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            dt.created_by,
            creator.name AS created_by_name,
            dt.remarks
        FROM portfolio.department_teachers dt
        LEFT JOIN portfolio.department ON dt.department_uuid = department.uuid
        LEFT JOIN hr.users teacher ON dt.teacher_uuid = teacher.uuid
        LEFT JOIN hr.users creator ON dt.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("department_uuid"),
        Column::text("teacher_uuid"),
        Column::text("teacher_designation"),
        Column::text("teacher_email"),
        Column::text("teacher_phone"),
        Column::boolean("department_head"),
        Column::text("education"),
        Column::text("publication"),
        Column::text("journal"),
        Column::date("appointment_date"),
        Column::date("resign_date"),
        Column::text("about"),
        Column::text("department_head_message"),
        Column::text("teacher_initial"),
        Column::integer("index"),
        Column::boolean("status"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "id",
    order_by: BY_INDEX,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DepartmentTeacher {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub department_uuid: String,
    pub department_name: Option<String>,
    pub department_short_name: Option<String>,
    pub page_link: Option<String>,
    pub teacher_uuid: String,
    pub teacher_name: Option<String>,
    pub teacher_image: Option<String>,
    pub office: Option<String>,
    pub teacher_designation: Option<String>,
    pub teacher_email: Option<String>,
    pub teacher_phone: Option<String>,
    pub department_head: Option<bool>,
    pub education: Option<String>,
    pub publication: Option<String>,
    pub journal: Option<String>,
    pub appointment_date: Option<String>,
    pub resign_date: Option<String>,
    pub about: Option<String>,
    pub department_head_message: Option<String>,
    pub teacher_initial: Option<String>,
    pub index: Option<i64>,
    pub status: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DepartmentTeacherPayload {
    #[validate(required, length(equal = 21))]
    pub department_uuid: Option<String>,
    #[validate(required, length(equal = 21))]
    pub teacher_uuid: Option<String>,
    pub teacher_designation: Option<String>,
    #[validate(email)]
    pub teacher_email: Option<String>,
    pub teacher_phone: Option<String>,
    #[serde(default, deserialize_with = "form::opt_bool")]
    pub department_head: Option<bool>,
    pub education: Option<String>,
    pub publication: Option<String>,
    pub journal: Option<String>,
    #[validate(custom(function = "date"))]
    pub appointment_date: Option<String>,
    #[validate(custom(function = "date"))]
    pub resign_date: Option<String>,
    pub about: Option<String>,
    pub department_head_message: Option<String>,
    pub teacher_initial: Option<String>,
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub index: Option<i64>,
    #[serde(default, deserialize_with = "form::opt_bool")]
    pub status: Option<bool>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

/// `is_resign=true` keeps teachers still in post (no resign date), `false` keeps
/// former teachers, anything else keeps both.
pub fn resign_filter(filter: ListFilter, is_resign: Option<&str>) -> ListFilter {
    match tri_state(is_resign) {
        Some(true) => filter.is_null("resign_date"),
        Some(false) => filter.is_not_null("resign_date"),
        None => filter,
    }
}

impl Resource for DepartmentTeacher {
    type Payload = DepartmentTeacherPayload;
    const NAME: &'static str = "department teacher";
    const PATH: &'static str = "/portfolio/department-teachers";
    const TABLE: &'static Table = &DEPARTMENT_TEACHERS_TABLE;

    fn list_filter(query: &HashMap<String, String>) -> ListFilter {
        let filter = ListFilter::default()
            .eq_opt("department_name", query.get("portfolio_department"))
            .one_of(
                "department_short_name",
                allow_list(query_str(query, "access")),
            );
        resign_filter(filter, query_str(query, "is_resign"))
    }
}

/// Department page payload: the department row with its teachers inlined.
#[derive(Debug, Serialize)]
pub struct DepartmentDetails {
    #[serde(flatten)]
    pub department: Department,
    pub department_teachers: Vec<DepartmentTeacher>,
}

// --- Offer ---

pub static OFFER_TABLE: Table = Table {
    name: "portfolio.offer",
    select: r#"
        SELECT
            offer.id,
            offer.uuid,
            offer.serial,
            offer.title,
            offer.subtitle,
            offer.file,
            to_char(offer.deadline, 'YYYY-MM-DD') AS deadline,
            to_char(offer.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(offer.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            offer.created_by,
            creator.name AS created_by_name,
            offer.remarks
        FROM portfolio.offer
        LEFT JOIN hr.users creator ON offer.created_by = creator.uuid
    "#,
    columns: &[
        Column::integer("serial"),
        Column::text("title"),
        Column::text("subtitle"),
        Column::text("file"),
        Column::date("deadline"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "title",
    order_by: NEWEST_FIRST,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Offer {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub serial: Option<i64>,
    pub title: String,
    pub subtitle: Option<String>,
    pub file: Option<String>,
    pub deadline: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OfferPayload {
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub serial: Option<i64>,
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[validate(custom(function = "date"))]
    pub deadline: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for Offer {
    type Payload = OfferPayload;
    const NAME: &'static str = "offer";
    const PATH: &'static str = "/portfolio/offer";
    const TABLE: &'static Table = &OFFER_TABLE;
    const UPLOAD: Option<Upload> = Some(Upload {
        column: "file",
        folder: "public/offer",
    });
}

// --- Online admission ---

pub static ONLINE_ADMISSION_TABLE: Table = Table {
    name: "portfolio.online_admission",
    select: r#"
        SELECT
            oa.id,
            oa.uuid,
            oa.semester,
            oa.program_uuid,
            oa.applicant_name,
            oa.father_name,
            oa.mother_name,
            oa.local_guardian,
            to_char(oa.date_of_birth, 'YYYY-MM-DD') AS date_of_birth,
            oa.nationality,
            oa.blood_group,
            oa.phone_number,
            oa.email,
            oa.gender,
            oa.marital_status,
            oa.present_address,
            oa.village,
            oa.post_office,
            oa.thana,
            oa.district,
            oa.ssc_group,
            oa.ssc_grade,
            oa.ssc_gpa::float8 AS ssc_gpa,
            oa.ssc_board,
            oa.ssc_passing_year,
            oa.ssc_institute,
            oa.hsc_group,
            oa.hsc_grade,
            oa.hsc_gpa::float8 AS hsc_gpa,
            oa.hsc_board,
            oa.hsc_passing_year,
            oa.hsc_institute,
            oa.bsc_name,
            oa.bsc_cgpa::float8 AS bsc_cgpa,
            oa.bsc_passing_year,
            oa.bsc_institute,
            oa.bkash,
            to_char(oa.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(oa.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            oa.remarks
        FROM portfolio.online_admission oa
    "#,
    columns: &[
        Column::text("semester"),
        Column::text("program_uuid"),
        Column::text("applicant_name"),
        Column::text("father_name"),
        Column::text("mother_name"),
        Column::text("local_guardian"),
        Column::date("date_of_birth"),
        Column::text("nationality"),
        Column::text("blood_group"),
        Column::text("phone_number"),
        Column::text("email"),
        Column::text("gender"),
        Column::text("marital_status"),
        Column::text("present_address"),
        Column::text("village"),
        Column::text("post_office"),
        Column::text("thana"),
        Column::text("district"),
        Column::text("ssc_group"),
        Column::text("ssc_grade"),
        Column::decimal("ssc_gpa"),
        Column::text("ssc_board"),
        Column::text("ssc_passing_year"),
        Column::text("ssc_institute"),
        Column::text("hsc_group"),
        Column::text("hsc_grade"),
        Column::decimal("hsc_gpa"),
        Column::text("hsc_board"),
        Column::text("hsc_passing_year"),
        Column::text("hsc_institute"),
        Column::text("bsc_name"),
        Column::decimal("bsc_cgpa"),
        Column::text("bsc_passing_year"),
        Column::text("bsc_institute"),
        Column::text("bkash"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("remarks"),
    ],
    label: "applicant_name",
    order_by: NEWEST_FIRST,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OnlineAdmission {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub semester: String,
    pub program_uuid: String,
    pub applicant_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub local_guardian: String,
    pub date_of_birth: String,
    pub nationality: Option<String>,
    pub blood_group: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub present_address: Option<String>,
    pub village: Option<String>,
    pub post_office: Option<String>,
    pub thana: Option<String>,
    pub district: Option<String>,
    pub ssc_group: Option<String>,
    pub ssc_grade: Option<String>,
    pub ssc_gpa: Option<f64>,
    pub ssc_board: Option<String>,
    pub ssc_passing_year: Option<String>,
    pub ssc_institute: Option<String>,
    pub hsc_group: Option<String>,
    pub hsc_grade: Option<String>,
    pub hsc_gpa: Option<f64>,
    pub hsc_board: Option<String>,
    pub hsc_passing_year: Option<String>,
    pub hsc_institute: Option<String>,
    pub bsc_name: Option<String>,
    pub bsc_cgpa: Option<f64>,
    pub bsc_passing_year: Option<String>,
    pub bsc_institute: Option<String>,
    pub bkash: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OnlineAdmissionPayload {
    #[validate(required)]
    pub semester: Option<String>,
    #[validate(required, length(equal = 21))]
    pub program_uuid: Option<String>,
    #[validate(required, length(min = 5))]
    pub applicant_name: Option<String>,
    #[validate(required, length(min = 5))]
    pub father_name: Option<String>,
    #[validate(required, length(min = 5))]
    pub mother_name: Option<String>,
    #[validate(required, length(min = 5))]
    pub local_guardian: Option<String>,
    #[validate(required, custom(function = "date"))]
    pub date_of_birth: Option<String>,
    #[validate(required)]
    pub nationality: Option<String>,
    #[validate(required)]
    pub blood_group: Option<String>,
    #[validate(length(min = 11))]
    pub phone_number: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required)]
    pub gender: Option<String>,
    #[validate(required)]
    pub marital_status: Option<String>,
    #[validate(required)]
    pub present_address: Option<String>,
    #[validate(required)]
    pub village: Option<String>,
    #[validate(required)]
    pub post_office: Option<String>,
    #[validate(required)]
    pub thana: Option<String>,
    #[validate(required)]
    pub district: Option<String>,
    #[validate(required)]
    pub ssc_group: Option<String>,
    #[validate(required)]
    pub ssc_grade: Option<String>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    #[validate(required)]
    pub ssc_gpa: Option<f64>,
    #[validate(required)]
    pub ssc_board: Option<String>,
    #[validate(required, length(min = 4))]
    pub ssc_passing_year: Option<String>,
    #[validate(required)]
    pub ssc_institute: Option<String>,
    #[validate(required)]
    pub hsc_group: Option<String>,
    #[validate(required)]
    pub hsc_grade: Option<String>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    #[validate(required)]
    pub hsc_gpa: Option<f64>,
    #[validate(required)]
    pub hsc_board: Option<String>,
    #[validate(required, length(min = 4))]
    pub hsc_passing_year: Option<String>,
    #[validate(required)]
    pub hsc_institute: Option<String>,
    pub bsc_name: Option<String>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    pub bsc_cgpa: Option<f64>,
    pub bsc_passing_year: Option<String>,
    pub bsc_institute: Option<String>,
    #[validate(required, length(min = 11))]
    pub bkash: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for OnlineAdmission {
    type Payload = OnlineAdmissionPayload;
    const NAME: &'static str = "online admission";
    const PATH: &'static str = "/portfolio/online-admission";
    const TABLE: &'static Table = &ONLINE_ADMISSION_TABLE;
}

// --- Contact us ---

pub static CONTACT_US_TABLE: Table = Table {
    name: "portfolio.contact_us",
    select: r#"
        SELECT
            contact_us.id,
            contact_us.uuid,
            contact_us.name,
            contact_us.email,
            contact_us.phone,
            contact_us.question,
            contact_us.description,
            contact_us.is_response,
            to_char(contact_us.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(contact_us.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            contact_us.remarks
        FROM portfolio.contact_us
    "#,
    columns: &[
        Column::text("name"),
        Column::text("email"),
        Column::text("phone"),
        Column::text("question"),
        Column::text("description"),
        Column::boolean("is_response"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: NEWEST_FIRST,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContactUs {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub question: Option<String>,
    pub description: Option<String>,
    pub is_response: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ContactUsPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(required, length(min = 11))]
    pub phone: Option<String>,
    #[validate(required, length(min = 1))]
    pub question: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "form::opt_bool")]
    pub is_response: Option<bool>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for ContactUs {
    type Payload = ContactUsPayload;
    const NAME: &'static str = "contact us";
    const PATH: &'static str = "/portfolio/contact-us";
    const TABLE: &'static Table = &CONTACT_US_TABLE;
    const RESPONSE: ResponseStyle = ResponseStyle::Row;

    fn list_filter(query: &HashMap<String, String>) -> ListFilter {
        ListFilter::default().flag("is_response", tri_state(query_str(query, "is_response")))
    }
}

// --- Faculty ---

pub static FACULTY_TABLE: Table = Table {
    name: "portfolio.faculty",
    select: r#"
        SELECT
            faculty.id,
            faculty.uuid,
            faculty.name,
            to_char(faculty.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(faculty.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            faculty.created_by,
            creator.name AS created_by_name,
            faculty.remarks
        FROM portfolio.faculty
        LEFT JOIN hr.users creator ON faculty.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("name"),
        Column::timestamp("created_at"),
        Column::text("created_by"),
    ],
    label: "name",
    order_by: NEWEST_FIRST,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Faculty {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

/// `updated_at` and `remarks` are read-only for faculties.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct FacultyPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
}

impl Resource for Faculty {
    type Payload = FacultyPayload;
    const NAME: &'static str = "faculty";
    const PATH: &'static str = "/portfolio/faculty";
    const TABLE: &'static Table = &FACULTY_TABLE;
}

// --- Office ---

pub static OFFICE_TABLE: Table = Table {
    name: "portfolio.office",
    select: r#"
        SELECT
            office.id,
            office.uuid,
            office.title,
            office.category,
            office.image,
            office."index",
            to_char(office.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(office.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            office.created_by,
            creator.name AS created_by_name,
            office.remarks
        FROM portfolio.office
        LEFT JOIN hr.users creator ON office.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("title"),
        Column::text("category"),
        Column::text("image"),
        Column::integer("index"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "title",
    order_by: BY_INDEX,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Office {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub title: String,
    pub category: Option<String>,
    pub image: Option<String>,
    pub index: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OfficePayload {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub index: Option<i64>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for Office {
    type Payload = OfficePayload;
    const NAME: &'static str = "office";
    const PATH: &'static str = "/portfolio/office";
    const TABLE: &'static Table = &OFFICE_TABLE;
    const UPLOAD: Option<Upload> = Some(Upload {
        column: "image",
        folder: "public/office",
    });

    fn list_filter(query: &HashMap<String, String>) -> ListFilter {
        ListFilter::default().eq_opt("category", query.get("category"))
    }
}

// --- Office entry ---

pub static OFFICE_ENTRY_TABLE: Table = Table {
    name: "portfolio.office_entry",
    select: r#"
        SELECT
            oe.id,
            oe.uuid,
            oe.office_uuid,
            office.title AS office_title,
            oe.user_uuid,
            member.name AS user_name,
            member.image AS user_image,
            member.email AS user_email,
            member.phone AS user_phone,
            designation.name AS designation_name,
            to_char(oe.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(oe.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            oe.created_by,
            creator.name AS created_by_name,
            oe.remarks
        FROM portfolio.office_entry oe
        LEFT JOIN portfolio.office ON oe.office_uuid = office.uuid
        LEFT JOIN hr.users member ON oe.user_uuid = member.uuid
        LEFT JOIN hr.designation ON member.designation_uuid = designation.uuid
        LEFT JOIN hr.users creator ON oe.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("office_uuid"),
        Column::text("user_uuid"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "user_name",
    order_by: Some(OrderBy {
        column: "created_at",
        direction: Direction::Asc,
    }),
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OfficeEntry {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub office_uuid: String,
    pub office_title: Option<String>,
    pub user_uuid: String,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub designation_name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OfficeEntryPayload {
    #[validate(required, length(equal = 21))]
    pub office_uuid: Option<String>,
    #[validate(required, length(equal = 21))]
    pub user_uuid: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for OfficeEntry {
    type Payload = OfficeEntryPayload;
    const NAME: &'static str = "office entry";
    const PATH: &'static str = "/portfolio/office-entry";
    const TABLE: &'static Table = &OFFICE_ENTRY_TABLE;

    fn list_filter(query: &HashMap<String, String>) -> ListFilter {
        ListFilter::default().eq_opt("office_uuid", query.get("office_uuid"))
    }
}

/// Office page payload: the office with the people staffing it.
#[derive(Debug, Serialize)]
pub struct OfficeDetails {
    #[serde(flatten)]
    pub office: Office,
    pub office_entries: Vec<OfficeEntry>,
}
