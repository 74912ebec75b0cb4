// apps/seed/src/main.rs
//
// Synthetic data generator: fills the FHIR server with realistic patients and
// conflict-free appointments so the calendar has something to show.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use dotenv::dotenv;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calendar_cell::models::CalendarConfig;
use calendar_cell::services::picker::pick_slot;
use shared_aidbox::AidboxClient;
use shared_config::AppConfig;
use shared_models::fhir::{
    Appointment, AppointmentStatus, CodeableConcept, Coding, ContactPoint, HumanName,
    Participant, Patient, Reference, V2_0276_SYSTEM,
};

const DEFAULT_PATIENT_COUNT: usize = 500;

const COMMON_GIVEN_MALE: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
    "Christopher", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Andrew", "Joshua", "Kevin",
    "Brian", "George", "Ryan", "Jacob", "Nicholas", "Eric", "Jonathan", "Stephen", "Justin",
    "Scott", "Brandon", "Benjamin", "Samuel", "Gregory", "Alexander", "Patrick", "Frank", "Jack",
    "Tyler", "Aaron", "Henry", "Adam", "Nathan", "Peter", "Zachary", "Kyle", "Noah", "Ethan",
];

const COMMON_GIVEN_FEMALE: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica", "Sarah",
    "Karen", "Nancy", "Lisa", "Betty", "Helen", "Sandra", "Donna", "Carol", "Ruth", "Sharon",
    "Michelle", "Laura", "Kimberly", "Deborah", "Amy", "Angela", "Ashley", "Emma", "Olivia",
    "Cynthia", "Marie", "Janet", "Catherine", "Christine", "Samantha", "Rachel", "Carolyn",
    "Maria", "Heather", "Diane", "Julie", "Victoria", "Kelly", "Christina", "Lauren", "Hannah",
];

const COMMON_FAMILY: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall",
];

const DIVERSE_GIVEN_MALE: &[&str] = &[
    "Ahmed", "Chen", "Raj", "Diego", "Kofi", "Hiroshi", "Dmitri", "Giovanni", "Hassan", "Kwame",
    "Lars", "Pierre", "Ravi", "Sven", "Tariq", "Alejandro", "Muhammad", "Omar", "Yuki", "Kenji",
    "Aarav", "Arjun", "Miguel", "Carlos", "Luis", "Javier", "Rafael", "Marco", "Luca", "Matteo",
];

const DIVERSE_GIVEN_FEMALE: &[&str] = &[
    "Priya", "Mei", "Fatima", "Sofia", "Aisha", "Yuki", "Ingrid", "Francesca", "Zara", "Amara",
    "Ling", "Noor", "Kaia", "Elena", "Zoe", "Isabella", "Camila", "Valentina", "Lucia", "Carmen",
    "Rosa", "Ana", "Gabriela", "Alejandra", "Daniela", "Mariana", "Natalia", "Sakura", "Akiko",
    "Keiko",
];

const DIVERSE_FAMILY: &[&str] = &[
    "Patel", "Zhang", "Singh", "Kim", "Nguyen", "Ali", "Hassan", "Kumar", "Chen", "Wu", "Ahmed",
    "Khan", "Okafor", "Andersson", "Rossi", "Fernandez", "Morales", "Vargas", "Herrera",
    "Mendoza", "Silva", "Yamamoto", "Tanaka", "Watanabe", "Nakamura", "Kobayashi", "Sato",
    "Saito", "Takahashi", "Ito",
];

const FAKE_DOMAINS: &[&str] = &["example.com", "fakemail.org", "testdomain.net", "sample.co", "mockmail.io"];

// Weighted v2-0276 table: routine and check-ups dominate, emergencies are rare.
const APPOINTMENT_TYPES: &[(&str, &str)] = &[
    ("ROUTINE", "Routine appointment - default if not valued"),
    ("ROUTINE", "Routine appointment - default if not valued"),
    ("ROUTINE", "Routine appointment - default if not valued"),
    ("ROUTINE", "Routine appointment - default if not valued"),
    ("ROUTINE", "Routine appointment - default if not valued"),
    ("WALKIN", "A previously unscheduled walk-in visit"),
    ("CHECKUP", "A routine check-up, such as an annual physical"),
    ("CHECKUP", "A routine check-up, such as an annual physical"),
    ("CHECKUP", "A routine check-up, such as an annual physical"),
    ("CHECKUP", "A routine check-up, such as an annual physical"),
    ("CHECKUP", "A routine check-up, such as an annual physical"),
    ("CHECKUP", "A routine check-up, such as an annual physical"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("FOLLOWUP", "A follow up visit from a previous appointment"),
    ("EMERGENCY", "Emergency appointment"),
];

fn pick<'a, R: Rng>(rng: &mut R, pool: &'a [&str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or("")
}

fn generate_phone<R: Rng>(rng: &mut R) -> String {
    let area = rng.gen_range(200..1000);
    let exchange = rng.gen_range(200..1000);
    let number = rng.gen_range(0..10000);
    format!("{}{}{:04}", area, exchange, number)
}

fn generate_email<R: Rng>(rng: &mut R, first: &str, last: &str) -> String {
    let domain = pick(rng, FAKE_DOMAINS);
    let first = first.to_lowercase();
    let last = last.to_lowercase();
    match rng.gen_range(0..4) {
        0 => format!("{}.{}@{}", first, last, domain),
        1 => format!("{}{}@{}", first, last, domain),
        2 => format!("{}{}@{}", first, rng.gen_range(0..100), domain),
        _ => format!("{}{}@{}", &first[..1], last, domain),
    }
}

fn generate_birth_date<R: Rng>(rng: &mut R) -> Option<NaiveDate> {
    let year = Utc::now().year() - 20 - rng.gen_range(0..60);
    let month = rng.gen_range(1..=12);
    // Day capped at 28 to stay valid in every month.
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn generate_patient<R: Rng>(rng: &mut R) -> Patient {
    let male = rng.gen_bool(0.5);
    let common = rng.gen_bool(0.9);

    let (given_pool, family_pool) = match (common, male) {
        (true, true) => (COMMON_GIVEN_MALE, COMMON_FAMILY),
        (true, false) => (COMMON_GIVEN_FEMALE, COMMON_FAMILY),
        (false, true) => (DIVERSE_GIVEN_MALE, DIVERSE_FAMILY),
        (false, false) => (DIVERSE_GIVEN_FEMALE, DIVERSE_FAMILY),
    };
    let first = pick(rng, given_pool);
    let last = pick(rng, family_pool);

    let telecom = if rng.gen_bool(0.4) {
        vec![
            ContactPoint {
                system: Some("phone".to_string()),
                value: Some(generate_phone(rng)),
                use_: Some("home".to_string()),
            },
            ContactPoint {
                system: Some("email".to_string()),
                value: Some(generate_email(rng, first, last)),
                use_: Some("home".to_string()),
            },
        ]
    } else {
        vec![]
    };

    Patient {
        resource_type: "Patient".to_string(),
        id: None,
        active: Some(rng.gen_bool(0.97)),
        name: vec![HumanName {
            given: vec![first.to_string()],
            family: Some(last.to_string()),
        }],
        gender: Some(if male { "male" } else { "female" }.to_string()),
        birth_date: generate_birth_date(rng),
        telecom,
    }
}

fn generate_appointment<R: Rng>(
    rng: &mut R,
    used_slots: &mut HashSet<String>,
    calendar: &CalendarConfig,
    patient_id: &str,
    patient_name: &str,
) -> Appointment {
    let now = Utc::now();
    let start = pick_slot(rng, used_slots, now, calendar);
    let duration = calendar.slot_minutes();

    // Past visits already happened; future ones split between firm and tentative.
    let status = if start < now {
        AppointmentStatus::Fulfilled
    } else if rng.gen_bool(0.5) {
        AppointmentStatus::Booked
    } else {
        AppointmentStatus::Pending
    };

    let (code, display) = APPOINTMENT_TYPES
        .choose(rng)
        .copied()
        .unwrap_or(("ROUTINE", "Routine appointment - default if not valued"));

    Appointment {
        resource_type: "Appointment".to_string(),
        id: None,
        status,
        appointment_type: Some(CodeableConcept {
            coding: vec![Coding {
                system: Some(V2_0276_SYSTEM.to_string()),
                code: Some(code.to_string()),
                display: Some(display.to_string()),
            }],
            text: Some(display.to_string()),
        }),
        description: None,
        start: Some(start),
        end: Some(start + Duration::minutes(duration as i64)),
        minutes_duration: Some(duration),
        participant: vec![Participant {
            actor: Some(Reference {
                reference: Some(format!("Patient/{}", patient_id)),
                display: Some(patient_name.to_string()),
            }),
            status: Some("accepted".to_string()),
        }],
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let calendar = CalendarConfig::default();
    let aidbox = AidboxClient::new(&config);
    let mut rng = rand::thread_rng();

    let patient_count = std::env::var("SEED_PATIENT_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PATIENT_COUNT);

    info!("Generating {} patients with appointments...", patient_count);

    let mut patients: Vec<Patient> = Vec::with_capacity(patient_count);
    for i in 0..patient_count {
        let patient = generate_patient(&mut rng);
        match aidbox.create("Patient", &patient).await {
            Ok(created) => {
                patients.push(created);
                if i % 50 == 0 {
                    info!("Created {} patients...", i + 1);
                }
            }
            Err(e) => error!("Error creating Patient: {}", e),
        }
    }

    info!("Created {} patients", patients.len());

    // Appointment distribution: 30% none, 60% one, 10% two.
    let mut used_slots = HashSet::new();
    let mut appointment_count = 0usize;
    for (i, patient) in patients.iter().enumerate() {
        let visits = match rng.gen_range(0.0..1.0) {
            r if r < 0.3 => 0,
            r if r < 0.9 => 1,
            _ => 2,
        };

        let Some(patient_id) = patient.id.as_deref() else {
            warn!("Server returned a patient without an id, skipping appointments");
            continue;
        };

        for _ in 0..visits {
            let appointment = generate_appointment(
                &mut rng,
                &mut used_slots,
                &calendar,
                patient_id,
                &patient.display_name(),
            );
            match aidbox.create::<Appointment>("Appointment", &appointment).await {
                Ok(_) => appointment_count += 1,
                Err(e) => error!("Error creating Appointment: {}", e),
            }
        }

        if i % 100 == 0 {
            info!(
                "Processed {} patients, created {} appointments so far...",
                i + 1,
                appointment_count
            );
        }
    }

    info!("Created {} appointments", appointment_count);
    info!("Fake data generation complete!");
}
