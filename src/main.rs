mod cli;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use cli::{
    commands::{
        AppointmentCommands, ChronicArg, EditArgs, ExamCommands, OutputFormat, PatientCommands,
        RegisterArgs, UserCommands, VaccineCommands, VitalsArgs,
    },
    Cli, Commands,
};
use colored::*;
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use ubs360::{
    eligibility::EligibilityCalculator,
    error::{AppError, Result},
    forms::{Advance, ChronicForm, ExamForm, HomeVisitForm, RegistrationWizard, VaccineForm},
    models::{
        AppointmentStatus, ChronicProgram, EligibilityGroup, NewAppointment, PatientQuery,
        PatientStatusFilter, Program, Role, UserPayload,
    },
    routing::{RoleGate, Route},
    toast::ToastLevel,
    utils, AppContext, Config,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", format!("Failed to load configuration: {}", e).red());
            std::process::exit(1);
        }
    };

    init_logging(&config, matches!(cli.command, Commands::Tui));

    // `init` must work before a database exists
    if let Commands::Init { path } = &cli.command {
        if let Err(e) = config.write_default(Path::new(path)) {
            error!("Failed to write {}: {}", path, e);
            eprintln!("{}", format!("Error: {}", AppError::from(e).user_message()).red());
            std::process::exit(1);
        }
        println!("{} {}", "✓ Wrote".green(), path);
        return;
    }

    let ctx = match AppContext::open(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to open local storage: {}", e);
            eprintln!("{}", format!("Error: {}", e.user_message()).red());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Tui => run_tui(ctx.clone()).await,
        Commands::Init { .. } => Ok(()),
        Commands::Login { email, password } => login(&ctx, &email, password).await,
        Commands::Logout => logout(&ctx),
        Commands::Whoami => whoami(&ctx).await,
        Commands::Patients { action } => patients(&ctx, action).await,
        Commands::Register(args) => register(&ctx, args).await,
        Commands::Appointments { action } => appointments(&ctx, action).await,
        Commands::Visit { patient, date, reason, notes, vitals } => {
            home_visit(&ctx, patient, date, reason, notes, vitals).await
        }
        Commands::Visits { patient } => home_visits(&ctx, patient.as_deref()).await,
        Commands::Vaccines { action } => vaccines(&ctx, action).await,
        Commands::Exams { action } => exams(&ctx, action).await,
        Commands::Consult { program, patient, date, vitals, glycemia, hba1c, notes } => {
            let form = ChronicForm {
                patient_id: patient,
                date,
                systolic: vitals.systolic,
                diastolic: vitals.diastolic,
                weight: vitals.weight,
                height: vitals.height,
                glycemia,
                hba1c,
                notes: notes.unwrap_or_default(),
            };
            consult(&ctx, program, form).await
        }
        Commands::Indicators { program, format } => indicators(&ctx, program, format).await,
        Commands::Notifications { mark_read, all } => notifications(&ctx, mark_read, all).await,
        Commands::Users { action } => users(&ctx, action).await,
        Commands::MicroAreas => micro_areas(&ctx).await,
        Commands::Eligibility { birth_date, today } => eligibility(&birth_date, today),
    };

    flush_toasts(&ctx);

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("{}", format!("Error: {}", e.user_message()).red());
        if e.is_session_fatal() {
            eprintln!("{}", "Run `ubs360 login` to start a new session.".yellow());
        }
        std::process::exit(1);
    }
}

fn init_logging(config: &Config, tui: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    if !tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    // The TUI owns the terminal, so logs go to a file
    match OpenOptions::new().create(true).append(true).open(&config.logging.file) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

#[cfg(feature = "tui")]
async fn run_tui(ctx: AppContext) -> Result<()> {
    ubs360::tui::run_tui(ctx).await
}

#[cfg(not(feature = "tui"))]
async fn run_tui(_ctx: AppContext) -> Result<()> {
    println!("{}", "Built without the `tui` feature".yellow());
    Ok(())
}

/// Toasts raised while a command ran, printed once it finishes.
fn flush_toasts(ctx: &AppContext) {
    for toast in ctx.toasts.drain() {
        let line = match toast.level {
            ToastLevel::Success => format!("✓ {}", toast.message).green(),
            ToastLevel::Info => format!("ℹ {}", toast.message).blue(),
            ToastLevel::Warning => format!("⚠ {}", toast.message).yellow(),
            ToastLevel::Error => format!("✗ {}", toast.message).red(),
        };
        println!("{}", line);
    }
}

/// Same decision, and the same warning, the TUI gives before showing a screen.
fn require(ctx: &AppContext, route: Route) -> Result<()> {
    RoleGate::new().require(ctx.current_user().as_ref(), &route, &ctx.toasts)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_arg<T: std::str::FromStr<Err = String>>(raw: &str) -> Result<T> {
    raw.parse::<T>().map_err(AppError::InvalidInput)
}

async fn login(ctx: &AppContext, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let spinner = utils::spinner("Entrando...");
    let result = ctx.login(email, &password).await;
    spinner.finish_and_clear();

    let session = result?;
    println!(
        "{} {} ({})",
        "✓ Logged in as".green(),
        session.user.name.bold(),
        session.user.role
    );
    Ok(())
}

fn read_password() -> Result<String> {
    use std::io::{self, Write};

    print!("Senha: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn logout(ctx: &AppContext) -> Result<()> {
    ctx.logout()?;
    println!("{}", "✓ Logged out".green());
    Ok(())
}

async fn whoami(ctx: &AppContext) -> Result<()> {
    if ctx.current_session().is_none() {
        return Err(AppError::Unauthorized);
    }
    let user = ctx.refresh_current_user().await?;

    println!("\n{}", "=== Session ===".cyan().bold());
    println!("Name:       {}", user.name);
    println!("Email:      {}", user.email);
    println!("Role:       {}", user.role.to_string().yellow());
    if let Some(area) = &user.micro_area_id {
        println!("Micro-area: {}", area);
    }
    println!("Backend:    {}", ctx.api.base_url());
    Ok(())
}

async fn patients(ctx: &AppContext, action: PatientCommands) -> Result<()> {
    require(ctx, Route::Patients)?;

    match action {
        PatientCommands::List {
            search,
            micro_area,
            agent,
            group,
            status,
            min_age,
            max_age,
            page,
            limit,
            format,
        } => {
            let query = PatientQuery {
                page,
                limit,
                search,
                micro_area_id: micro_area,
                agent_id: agent,
                group: group.as_deref().map(parse_arg::<EligibilityGroup>).transpose()?,
                status: parse_arg::<PatientStatusFilter>(&status)?,
                min_age,
                max_age,
            };
            list_patients(ctx, &query, format).await
        }
        PatientCommands::Show { id, format } => show_patient(ctx, &id, format).await,
        PatientCommands::Timeline { id } => patient_timeline(ctx, &id).await,
        PatientCommands::Edit(args) => edit_patient(ctx, args).await,
        PatientCommands::Inactivate { id, yes } => {
            let patient = ctx.patient(&id).await?;
            if !yes && !utils::confirm_action(&format!("Inativar {}?", patient.name)) {
                println!("Cancelled");
                return Ok(());
            }
            ctx.inactivate_patient(&id).await
        }
    }
}

async fn list_patients(ctx: &AppContext, query: &PatientQuery, format: OutputFormat) -> Result<()> {
    let spinner = utils::spinner("Carregando pacientes...");
    let result = ctx.patients(query).await;
    spinner.finish_and_clear();
    let page = result?;

    if format == OutputFormat::Json {
        return print_json(&page);
    }

    let calc = EligibilityCalculator::today_utc();
    let widths = [24, 16, 12, 6, 36];
    utils::print_table_border(100);
    utils::print_table_row(&["Nome", "CPF", "Nascimento", "Idade", "Grupos"], &widths);
    utils::print_table_border(100);
    for patient in &page.data {
        let cpf = patient.cpf.as_deref().map(utils::format_cpf).unwrap_or_default();
        let age = calc
            .age_years(&patient.birth_date)
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        utils::print_table_row(
            &[
                &patient.name,
                &cpf,
                &utils::format_date(&patient.birth_date),
                &age,
                &patient.flags.labels().join(", "),
            ],
            &widths,
        );
    }
    utils::print_table_border(100);
    println!(
        "Página {} de {} ({} pacientes)",
        page.page,
        page.total_pages().max(1),
        page.total
    );
    Ok(())
}

async fn show_patient(ctx: &AppContext, id: &str, format: OutputFormat) -> Result<()> {
    let (patient, vaccines, exams) =
        tokio::try_join!(ctx.patient(id), ctx.vaccines(id), ctx.exams(id))?;

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "patient": patient,
            "vaccines": vaccines,
            "exams": exams,
        }));
    }

    let calc = EligibilityCalculator::today_utc();
    println!("\n{}", format!("=== {} ===", patient.name).cyan().bold());
    if let Some(social) = &patient.social_name {
        println!("Nome social: {}", social);
    }
    println!("Nascimento:  {}", utils::format_date(&patient.birth_date));
    if let Some(band) = calc.age_band(&patient.birth_date) {
        println!("Faixa:       {}", band.label());
    }
    if let Some(cpf) = &patient.cpf {
        println!("CPF:         {}", utils::format_cpf(cpf));
    }
    if let Some(cns) = &patient.cns {
        println!("CNS:         {}", cns);
    }
    println!(
        "Endereço:    {}, {} - {}",
        patient.address.street, patient.address.number, patient.address.neighborhood
    );
    println!("Grupos:      {}", patient.flags.labels().join(", "));
    if !patient.active {
        println!("{}", "Paciente inativo".red());
    }

    println!("\n{}", "Vacinas".yellow());
    for v in &vaccines {
        let when = v
            .applied_at
            .or(v.scheduled_for)
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default();
        println!("  {} {} {} [{}]", v.vaccine, v.dose, when, v.status);
    }

    println!("\n{}", "Exames".yellow());
    for e in &exams {
        let result = e.result.as_deref().unwrap_or("pendente");
        println!("  {} ({}) {}", e.name, e.requested_at.format("%d/%m/%Y"), result);
    }
    Ok(())
}

async fn patient_timeline(ctx: &AppContext, id: &str) -> Result<()> {
    let entries = ctx.timeline(id).await?;
    if entries.is_empty() {
        println!("{}", "Sem registros".yellow());
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{}  {}  {}",
            utils::format_timestamp(&entry.date).dimmed(),
            entry.kind.cyan(),
            entry.description
        );
    }
    Ok(())
}

async fn register(ctx: &AppContext, args: RegisterArgs) -> Result<()> {
    require(ctx, Route::Patients)?;

    let mut wizard = RegistrationWizard::new(EligibilityCalculator::today_utc());
    {
        let draft = wizard.draft_mut();
        draft.name = args.name;
        draft.social_name = args.social_name;
        draft.cpf = args.cpf;
        draft.cns = args.cns;
        draft.birth_date = args.birth_date;
        draft.sex = Some(parse_arg(&args.sex)?);
        draft.mother_name = args.mother_name;
        draft.phone = args.phone;
        draft.address.street = args.street;
        draft.address.number = args.number;
        draft.address.neighborhood = args.neighborhood;
        draft.address.city = args.city;
        draft.address.zip_code = args.zip;
        draft.micro_area_id = args.micro_area;
        draft.is_pregnant = args.pregnant;
        draft.is_postpartum = args.postpartum;
        draft.has_hypertension = args.hypertension;
        draft.has_diabetes = args.diabetes;
        draft.is_woman = args.woman;
    }

    let payload = loop {
        match wizard.advance()? {
            Advance::Moved(step) => info!("Registration step: {}", step.title()),
            Advance::Submit(payload) => break payload,
        }
    };

    let patient = ctx.register_patient(&payload).await?;
    println!("ID: {}", patient.id);
    Ok(())
}

async fn edit_patient(ctx: &AppContext, args: EditArgs) -> Result<()> {
    require(ctx, Route::PatientDetail(args.id.clone()))?;

    let patient = ctx.patient(&args.id).await?;
    let mut wizard = RegistrationWizard::editing(&patient, EligibilityCalculator::today_utc());
    {
        let draft = wizard.draft_mut();
        if let Some(name) = args.name {
            draft.name = name;
        }
        if let Some(birth_date) = args.birth_date {
            draft.birth_date = birth_date;
        }
        if let Some(sex) = args.sex {
            draft.sex = Some(parse_arg(&sex)?);
        }
        if let Some(social_name) = args.social_name {
            draft.social_name = social_name;
        }
        if let Some(phone) = args.phone {
            draft.phone = phone;
        }
        if let Some(street) = args.street {
            draft.address.street = street;
        }
        if let Some(number) = args.number {
            draft.address.number = number;
        }
        if let Some(neighborhood) = args.neighborhood {
            draft.address.neighborhood = neighborhood;
        }
        if let Some(city) = args.city {
            draft.address.city = city;
        }
        if let Some(zip) = args.zip {
            draft.address.zip_code = zip;
        }
        if let Some(micro_area) = args.micro_area {
            draft.micro_area_id = micro_area;
        }
        draft.is_pregnant = args.pregnant.unwrap_or(draft.is_pregnant);
        draft.is_postpartum = args.postpartum.unwrap_or(draft.is_postpartum);
        draft.has_hypertension = args.hypertension.unwrap_or(draft.has_hypertension);
        draft.has_diabetes = args.diabetes.unwrap_or(draft.has_diabetes);
    }

    let payload = loop {
        match wizard.advance()? {
            Advance::Moved(step) => info!("Edit step: {}", step.title()),
            Advance::Submit(payload) => break payload,
        }
    };

    let updated = ctx.update_patient(&args.id, &payload).await?;
    println!("{} {}", "✓ Updated".green(), updated.name.bold());
    Ok(())
}

async fn appointments(ctx: &AppContext, action: AppointmentCommands) -> Result<()> {
    require(ctx, Route::Appointments)?;

    match action {
        AppointmentCommands::List { patient, page } => {
            let list = ctx.appointments(patient.as_deref(), page).await?;
            let widths = [18, 20, 14, 12];
            utils::print_table_border(70);
            utils::print_table_row(&["Data", "Paciente", "Tipo", "Status"], &widths);
            utils::print_table_border(70);
            for a in &list.data {
                utils::print_table_row(
                    &[
                        &a.scheduled_at.format("%d/%m/%Y %H:%M").to_string(),
                        &a.patient_id,
                        &a.kind,
                        &a.status.to_string(),
                    ],
                    &widths,
                );
            }
            utils::print_table_border(70);
            Ok(())
        }
        AppointmentCommands::Create { patient, at, kind, notes } => {
            let scheduled_at = DateTime::parse_from_rfc3339(&at)
                .map_err(|e| AppError::InvalidInput(format!("at: {}", e)))?
                .with_timezone(&Utc);
            let appointment = NewAppointment {
                patient_id: patient,
                professional_id: ctx.current_user().map(|u| u.id),
                scheduled_at,
                kind,
                notes,
            };
            let created = ctx.create_appointment(&appointment).await?;
            println!("ID: {}", created.id);
            Ok(())
        }
        AppointmentCommands::Status { id, patient, status } => {
            let status: AppointmentStatus = parse_arg(&status)?;
            ctx.set_appointment_status(&id, &patient, status).await
        }
    }
}

async fn home_visit(
    ctx: &AppContext,
    patient: String,
    date: String,
    reason: String,
    notes: Option<String>,
    vitals: VitalsArgs,
) -> Result<()> {
    require(ctx, Route::HomeVisits)?;

    let form = HomeVisitForm {
        patient_id: patient,
        date,
        reason,
        notes: notes.unwrap_or_default(),
        weight: vitals.weight,
        height: vitals.height,
        systolic: vitals.systolic,
        diastolic: vitals.diastolic,
    };
    let visit = ctx.create_home_visit(&form).await?;
    println!("ID: {}", visit.id);
    Ok(())
}

async fn home_visits(ctx: &AppContext, patient: Option<&str>) -> Result<()> {
    require(ctx, Route::HomeVisits)?;

    let visits = ctx.home_visits(patient).await?;
    let widths = [12, 20, 36];
    utils::print_table_border(72);
    utils::print_table_row(&["Data", "Paciente", "Motivo"], &widths);
    utils::print_table_border(72);
    for v in &visits.data {
        utils::print_table_row(
            &[&v.visit_date.format("%d/%m/%Y").to_string(), &v.patient_id, &v.reason],
            &widths,
        );
    }
    utils::print_table_border(72);
    println!("{} visitas", visits.total);
    Ok(())
}

async fn vaccines(ctx: &AppContext, action: VaccineCommands) -> Result<()> {
    match action {
        VaccineCommands::List { patient } => {
            require(ctx, Route::PatientDetail(patient.clone()))?;
            let records = ctx.vaccines(&patient).await?;
            if records.is_empty() {
                println!("{}", "Sem vacinas registradas".yellow());
            }
            for v in &records {
                let when = v
                    .applied_at
                    .or(v.scheduled_for)
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_default();
                println!("{:<24} {:<10} {:<10} {}", v.vaccine, v.dose, when, v.status);
            }
            Ok(())
        }
        VaccineCommands::Record { patient, vaccine, dose, date } => {
            require(ctx, Route::PatientDetail(patient.clone()))?;
            let form = VaccineForm { patient_id: patient, vaccine, dose, applied_at: date };
            let record = ctx.record_vaccine(&form.to_payload()?).await?;
            println!("ID: {}", record.id);
            Ok(())
        }
    }
}

async fn exams(ctx: &AppContext, action: ExamCommands) -> Result<()> {
    match action {
        ExamCommands::List { patient } => {
            require(ctx, Route::PatientDetail(patient.clone()))?;
            let exams = ctx.exams(&patient).await?;
            if exams.is_empty() {
                println!("{}", "Sem exames registrados".yellow());
            }
            for e in &exams {
                let result = e.result.as_deref().unwrap_or("pendente");
                println!("{:<28} {}  {}", e.name, e.requested_at.format("%d/%m/%Y"), result);
            }
            Ok(())
        }
        ExamCommands::Record { patient, name, requested, result_date, result } => {
            require(ctx, Route::PatientDetail(patient.clone()))?;
            let form = ExamForm {
                patient_id: patient,
                name,
                requested_at: requested,
                result_at: result_date,
                result,
            };
            let exam = ctx.record_exam(&form.to_payload()?).await?;
            println!("ID: {}", exam.id);
            Ok(())
        }
    }
}

async fn consult(ctx: &AppContext, program: ChronicArg, form: ChronicForm) -> Result<()> {
    require(ctx, Route::PatientDetail(form.patient_id.clone()))?;

    let program = match program {
        ChronicArg::Hypertension => ChronicProgram::Hypertension,
        ChronicArg::Diabetes => ChronicProgram::Diabetes,
    };
    ctx.record_chronic_consultation(program, &form).await
}

async fn indicators(ctx: &AppContext, program: Option<String>, format: OutputFormat) -> Result<()> {
    require(ctx, Route::Indicators)?;

    let indicators = match program {
        Some(slug) => {
            let program: Program = parse_arg(&slug)?;
            vec![ctx.api.program_indicator(program).await?]
        }
        None => ctx.indicators().await?,
    };

    if format == OutputFormat::Json {
        return print_json(&indicators);
    }

    for indicator in &indicators {
        let tally = indicator.tally();
        println!(
            "\n{} ({} pacientes)  {} {} {}",
            indicator.program.label().cyan().bold(),
            indicator.patient_count,
            tally.green.to_string().green(),
            tally.yellow.to_string().yellow(),
            tally.red.to_string().red()
        );
        for criterion in &indicator.criteria {
            println!(
                "  {:<6} {}  {}",
                criterion.code,
                utils::format_status(criterion.status),
                criterion.description
            );
        }
    }
    Ok(())
}

async fn notifications(ctx: &AppContext, mark_read: Option<String>, all: bool) -> Result<()> {
    require(ctx, Route::Notifications)?;

    if all {
        return ctx.mark_all_notifications_read().await;
    }
    if let Some(id) = mark_read {
        ctx.mark_notification_read(&id).await?;
        println!("{}", "✓ Marked as read".green());
        return Ok(());
    }

    let (list, unread) = tokio::try_join!(ctx.notifications(), ctx.unread_count())?;
    println!("{} não lidas", unread.to_string().yellow().bold());
    for n in &list {
        let marker = if n.read { " ".normal() } else { "●".blue() };
        println!(
            "{} {}  {}  {}",
            marker,
            utils::format_timestamp(&n.created_at).dimmed(),
            n.title.bold(),
            n.message
        );
    }
    Ok(())
}

async fn users(ctx: &AppContext, action: UserCommands) -> Result<()> {
    require(ctx, Route::Users)?;

    match action {
        UserCommands::List => {
            let users = ctx.users().await?;
            let widths = [24, 30, 12];
            utils::print_table_border(70);
            utils::print_table_row(&["Nome", "Email", "Perfil"], &widths);
            utils::print_table_border(70);
            for u in &users {
                utils::print_table_row(&[&u.name, &u.email, u.role.as_str()], &widths);
            }
            utils::print_table_border(70);
            Ok(())
        }
        UserCommands::Update { id, name, email, role, micro_area } => {
            let current = ctx
                .users()
                .await?
                .into_iter()
                .find(|u| u.id == id)
                .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;
            let payload = UserPayload {
                name: name.unwrap_or(current.name),
                email: email.unwrap_or(current.email),
                role: role.as_deref().map(parse_arg::<Role>).transpose()?.unwrap_or(current.role),
                password: None,
                micro_area_id: micro_area.or(current.micro_area_id),
            };
            let user = ctx.update_user(&id, &payload).await?;
            println!("{} {}", "✓ Updated".green(), user.name.bold());
            Ok(())
        }
        UserCommands::Create { name, email, role, password, micro_area } => {
            let payload = UserPayload {
                name,
                email,
                role: parse_arg::<Role>(&role)?,
                password: Some(password),
                micro_area_id: micro_area,
            };
            let user = ctx.create_user(&payload).await?;
            println!("ID: {}", user.id);
            Ok(())
        }
    }
}

async fn micro_areas(ctx: &AppContext) -> Result<()> {
    require(ctx, Route::MicroAreas)?;

    let areas = ctx.micro_areas().await?;
    let widths = [10, 30, 16];
    utils::print_table_border(60);
    utils::print_table_row(&["ID", "Nome", "Agente"], &widths);
    utils::print_table_border(60);
    for area in &areas {
        utils::print_table_row(
            &[&area.id, &area.name, area.agent_id.as_deref().unwrap_or("-")],
            &widths,
        );
    }
    utils::print_table_border(60);
    Ok(())
}

fn eligibility(birth_date: &str, today: Option<String>) -> Result<()> {
    let calc = match today {
        Some(raw) => EligibilityCalculator::new(
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|e| AppError::InvalidInput(format!("today: {}", e)))?,
        ),
        None => EligibilityCalculator::today_utc(),
    };

    let flags = calc.flags(birth_date);
    println!("Referência: {}", calc.today().format("%d/%m/%Y"));
    match calc.age_years(birth_date) {
        Some(age) => println!("Idade:      {} anos", age),
        None => println!("{}", "Data de nascimento inválida".yellow()),
    }
    if let Some(band) = calc.age_band(birth_date) {
        println!("Faixa:      {}", band.label());
    }
    println!("isChild:    {}", flags.is_child);
    println!("isElderly:  {}", flags.is_elderly);
    Ok(())
}
