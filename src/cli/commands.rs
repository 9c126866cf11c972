//! Command handlers. Each one drives the same view model the matching
//! screen uses and prints its state.

use color_eyre::eyre::{eyre, Result};
use std::time::Duration;

use super::args::CliCommand;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::state::{
    DashboardViewModel, ExamListViewModel, ExamResultViewModel, ProfileViewModel,
    SubjectDetailViewModel, UploadFile,
};
use crate::view_state::language_label;

fn report(err: AppError) -> color_eyre::Report {
    eyre!("{} ({})", err.user_message(), err.error_code())
}

/// Run an API command against a signed-in client.
pub async fn run_command(command: &CliCommand, api: ApiClient, config: &ClientConfig) -> Result<()> {
    match command {
        CliCommand::Subjects => subjects(api).await,
        CliCommand::Exams { subject } => exams(api, subject).await,
        CliCommand::Jobs { subject } => jobs(api, subject).await,
        CliCommand::Upload { subject, files } => {
            let files = files.iter().map(|f| UploadFile::path(f.clone())).collect();
            upload(api, subject, files, config.poll_interval).await
        }
        CliCommand::Result { subject, exam } => result(api, subject, exam).await,
        CliCommand::Profile => profile(api).await,
        other => Err(eyre!("{:?} is not an API command", other)),
    }
}

async fn subjects(api: ApiClient) -> Result<()> {
    let vm = DashboardViewModel::new(api);
    vm.load(false).await.map_err(report)?;
    let state = vm.snapshot();
    let totals = state.totals();
    println!(
        "{} group(s), {} subject(s), {} PDF(s), {} exam(s)",
        totals.groups, totals.subjects, totals.pdfs, totals.exams
    );
    for subject in state.visible_subjects() {
        let group = subject
            .group_id
            .as_deref()
            .and_then(|id| state.group_name(id))
            .unwrap_or("-");
        println!(
            "{:<24} {:<32} group: {:<16} pdfs: {:<3} exams: {}",
            subject.id, subject.name, group, subject.pdf_count, subject.exam_count
        );
    }
    Ok(())
}

async fn exams(api: ApiClient, subject: &str) -> Result<()> {
    let vm = ExamListViewModel::new(api, subject);
    vm.load_exams(false).await.map_err(report)?;
    let state = vm.snapshot();
    if state.is_empty() {
        println!("No exams yet");
    }
    for row in state.rows() {
        let mut actions = Vec::new();
        if row.can_take {
            actions.push("take".to_string());
        }
        if row.can_view_result {
            actions.push(format!("result {}", row.score_label.clone().unwrap_or_default()));
        }
        if row.show_progress {
            actions.push(format!("{}%", row.progress));
        }
        println!(
            "{:<8} {:<32} {:>3}q {:<8} {:<12} {}",
            row.short_id,
            row.title,
            row.question_count,
            row.difficulty_label,
            row.status_label,
            actions.join(", ")
        );
    }
    Ok(())
}

async fn jobs(api: ApiClient, subject: &str) -> Result<()> {
    let vm = SubjectDetailViewModel::new(api, subject);
    vm.load_jobs(false).await.map_err(report)?;
    for job in vm.snapshot().job_views() {
        println!(
            "{:<8} {:<16} {:<10} {:>3}% {:>8} {}",
            job.short_id,
            job.kind_label,
            job.status_label,
            job.progress,
            job.elapsed,
            job.error.unwrap_or_default()
        );
    }
    Ok(())
}

async fn upload(
    api: ApiClient,
    subject: &str,
    files: Vec<UploadFile>,
    poll_interval: Duration,
) -> Result<()> {
    let vm = SubjectDetailViewModel::new(api, subject);
    let mut progress = vm.uploads().state().subscribe();
    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let state = progress.borrow_and_update().clone();
            if let Some(file) = state.current_file {
                eprintln!(
                    "[{}/{}] {}",
                    state.progress.current + 1,
                    state.progress.total,
                    file
                );
            }
        }
    });

    let report_result = vm.upload(files).await;
    vm.dispose();
    // the receiver ends once the queue's sender is dropped with the view model
    drop(vm);
    let _ = tokio::time::timeout(poll_interval, printer).await;

    let upload = report_result.map_err(report)?;
    match upload.failure {
        None => {
            println!("Uploaded {} file(s)", upload.uploaded.len());
            Ok(())
        }
        Some((index, err)) => Err(eyre!(
            "Uploaded {} of {} file(s); file {} failed: {}",
            upload.uploaded.len(),
            upload.total,
            index + 1,
            err.user_message()
        )),
    }
}

async fn result(api: ApiClient, subject: &str, exam: &str) -> Result<()> {
    let vm = ExamResultViewModel::new(api, subject, exam);
    vm.load(false).await.map_err(report)?;
    let state = vm.snapshot();
    let Some(view) = state.result.data() else {
        return Err(eyre!("No result available"));
    };

    if !view.graded {
        println!("{}", view.status_label);
        if let Some(job) = &view.grading_job {
            println!("Grading job {}: {} ({}%)", job.short_id, job.status_label, job.progress);
        }
        return Ok(());
    }

    println!(
        "Score: {} ({}) {}",
        view.score_label,
        view.percentage_label,
        view.grade.map(|g| g.label()).unwrap_or_default()
    );
    if let Some(feedback) = &view.overall_feedback {
        println!("\n{}", feedback);
    }
    for (title, items) in [
        ("Strengths", &view.strengths),
        ("Weaknesses", &view.weaknesses),
        ("Recommendations", &view.recommendations),
    ] {
        if !items.is_empty() {
            println!("\n{}:", title);
            for item in items {
                println!("  - {}", item);
            }
        }
    }
    println!();
    for row in &view.rows {
        println!("{:>2}. [{}] {}", row.number, row.score_label, row.prompt);
        println!("    Your answer: {}", row.answer);
        if let Some(feedback) = &row.feedback {
            println!("    {}", feedback);
        }
    }
    Ok(())
}

async fn profile(api: ApiClient) -> Result<()> {
    let vm = ProfileViewModel::new(api);
    vm.load(false).await.map_err(report)?;
    let state = vm.snapshot();
    let Some(profile) = state.profile.data() else {
        return Err(eyre!("Profile not available"));
    };
    println!("{} <{}>", profile.greeting_name(), profile.email);
    if let Some(code) = &profile.language_preference {
        println!("Language: {}", language_label(code));
    }
    Ok(())
}
