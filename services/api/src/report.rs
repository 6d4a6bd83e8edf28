use crate::infra::{dollars, load_registry};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use vash_standards::config::AppConfig;
use vash_standards::error::AppError;
use vash_standards::listings::{self, ListingImport};
use vash_standards::standards::{
    effective_standard, plan_search, qualify, resolve_tier, standard_for, towns,
    AuthorityDefinition, AuthorityRegistry, BedroomSize, Diagnostic, Location,
    QualificationReport, QualificationResult, SearchPlan, StandardsError, VoucherContext,
};

#[derive(Args, Debug)]
pub(crate) struct TownsArgs {
    /// County, county authority abbreviation or registry key
    #[arg(long)]
    pub(crate) county: String,
}

#[derive(Args, Debug)]
pub(crate) struct StandardArgs {
    #[arg(long)]
    pub(crate) county: String,
    /// Town names or ZIP codes, comma separated
    #[arg(long = "location", value_delimiter = ',', required = true)]
    pub(crate) locations: Vec<String>,
    /// Voucher bedroom size (studio, 1, 2, ...)
    #[arg(long, value_parser = crate::infra::parse_bedrooms)]
    pub(crate) voucher: BedroomSize,
    /// Unit bedroom size; applies the lesser-of rule when given
    #[arg(long, value_parser = crate::infra::parse_bedrooms)]
    pub(crate) unit: Option<BedroomSize>,
}

#[derive(Args, Debug)]
pub(crate) struct QualifyArgs {
    #[arg(long)]
    pub(crate) county: String,
    /// Voucher bedroom size (studio, 1, 2, ...)
    #[arg(long, value_parser = crate::infra::parse_bedrooms)]
    pub(crate) voucher: BedroomSize,
    /// Unit sizes to search, comma separated. Defaults to the voucher size.
    #[arg(long, value_delimiter = ',', value_parser = crate::infra::parse_bedrooms)]
    pub(crate) sizes: Vec<BedroomSize>,
    /// Town names or ZIP codes, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) locations: Vec<String>,
    /// RentCast JSON response or listings CSV export
    #[arg(long)]
    pub(crate) listings: PathBuf,
}

fn registry() -> Result<AuthorityRegistry, AppError> {
    let config = AppConfig::load()?;
    load_registry(&config)
}

pub(crate) fn run_authorities() -> Result<(), AppError> {
    let registry = registry()?;
    print!("{}", render_authorities(&registry));
    Ok(())
}

pub(crate) fn run_towns(args: TownsArgs) -> Result<(), AppError> {
    let registry = registry()?;
    let authority = registry.get_authority(&args.county)?;

    println!("{} ({}) towns", authority.name, authority.abbreviation);
    for town in towns(authority) {
        println!("  {town}");
    }
    Ok(())
}

pub(crate) fn run_standard(args: StandardArgs) -> Result<(), AppError> {
    let registry = registry()?;
    let authority = registry.get_authority(&args.county)?;
    print!("{}", render_standards(authority, &args)?);
    Ok(())
}

pub(crate) fn run_qualify(args: QualifyArgs) -> Result<(), AppError> {
    let registry = registry()?;
    let authority = registry.get_authority(&args.county)?;

    let sizes = if args.sizes.is_empty() {
        vec![args.voucher]
    } else {
        args.sizes
    };
    let context = VoucherContext::new(args.voucher, sizes, args.locations);

    let plan = plan_search(authority, &context)?;
    let import = listings::from_path(&args.listings)?;
    let report = qualify(authority, &import.listings, &context, &plan.resolutions);

    print!(
        "{}",
        render_qualification(authority, &context, &plan, &import, &report)
    );
    Ok(())
}

pub(crate) fn render_authorities(registry: &AuthorityRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Configured housing authorities");
    for authority in registry.authorities() {
        let summary = authority.summary();
        let _ = writeln!(
            out,
            "- {} ({}) serving {}: effective {}, {} towns, {} ZIP codes, {} tiers",
            summary.authority,
            summary.abbreviation,
            summary.county,
            summary.effective_date,
            summary.town_count,
            summary.zip_count,
            summary.tier_count
        );
        let _ = writeln!(out, "  Source: {}", summary.source_url);
    }
    out
}

pub(crate) fn render_standards(
    authority: &AuthorityDefinition,
    args: &StandardArgs,
) -> Result<String, StandardsError> {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} payment standards (effective {})",
        authority.abbreviation, authority.effective_date
    );
    let _ = match args.unit {
        Some(unit) => writeln!(
            out,
            "Voucher: {} | Unit: {}",
            args.voucher.label(),
            unit.label()
        ),
        None => writeln!(out, "Voucher: {}", args.voucher.label()),
    };

    for raw in args.locations.iter().filter(|raw| !raw.trim().is_empty()) {
        let location = Location::parse(raw);
        let tier = match resolve_tier(authority, raw) {
            Ok(tier) => tier,
            Err(err @ StandardsError::UnknownLocation { .. }) => {
                let _ = writeln!(out, "  {location}: {err}");
                continue;
            }
            Err(err) => return Err(err),
        };

        let (bedrooms, amount) = match args.unit {
            Some(unit) => {
                let standard = effective_standard(authority, &tier, args.voucher, Some(unit))?;
                (standard.bedrooms, standard.amount)
            }
            None => (args.voucher, standard_for(authority, &tier, args.voucher)?),
        };
        let _ = writeln!(
            out,
            "  {location}: tier {tier}, {} standard {}",
            bedrooms.label(),
            dollars(i64::from(amount))
        );
    }

    Ok(out)
}

pub(crate) fn render_qualification(
    authority: &AuthorityDefinition,
    context: &VoucherContext,
    plan: &SearchPlan,
    import: &ListingImport,
    report: &QualificationReport,
) -> String {
    let mut out = String::new();
    let searched = context
        .search_bedrooms
        .iter()
        .map(|size| size.label())
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(
        out,
        "{} listing check (standards effective {})",
        authority.abbreviation, authority.effective_date
    );
    let _ = writeln!(
        out,
        "Voucher: {} | Searching: {}",
        context.voucher_bedrooms.label(),
        searched
    );

    let _ = writeln!(out, "\nPayment limits at voucher size");
    for limit in &plan.payment_limits {
        let _ = writeln!(
            out,
            "  {}  tier {}  {}",
            limit.zip_code,
            limit.tier,
            dollars(i64::from(limit.amount))
        );
    }
    for diagnostic in &plan.diagnostics {
        let _ = writeln!(out, "  {}: {}", diagnostic.location, diagnostic.detail);
    }

    let summary = report.summary();
    let skipped = summary.skipped + import.rejected.len();
    let _ = writeln!(
        out,
        "\nListings: {} checked, {} qualify, {} over the standard, {} skipped",
        summary.processed, summary.qualifying, summary.non_qualifying, skipped
    );

    let (qualifying, over): (Vec<_>, Vec<_>) =
        report.results.iter().partition(|result| result.qualifies);
    render_results(&mut out, "Qualifying", &qualifying);
    render_results(&mut out, "Over the standard", &over);

    if skipped > 0 {
        let _ = writeln!(out, "\nSkipped");
        for diagnostic in import.rejected.iter().chain(&report.diagnostics) {
            render_diagnostic(&mut out, diagnostic);
        }
    }

    out
}

fn render_results(out: &mut String, heading: &str, results: &[&QualificationResult]) {
    if results.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n{heading}");
    for result in results {
        let label = result
            .address
            .as_deref()
            .or(result.listing_id.as_deref())
            .unwrap_or(result.location.as_str());
        let _ = writeln!(
            out,
            "  {} {} in {} (tier {}): rent {}, standard {} at {}, margin {}",
            label,
            result.unit_bedrooms,
            result.location,
            result.tier,
            dollars(i64::from(result.rent)),
            dollars(i64::from(result.effective_standard)),
            result.effective_bedrooms,
            dollars(result.margin)
        );
    }
}

fn render_diagnostic(out: &mut String, diagnostic: &Diagnostic) {
    let position = diagnostic
        .listing_index
        .map(|index| format!("#{} ", index + 1))
        .unwrap_or_default();
    let id = diagnostic.listing_id.as_deref().unwrap_or("listing");
    let _ = writeln!(
        out,
        "  {position}{id} ({}): {}. {}",
        if diagnostic.location.is_empty() {
            "no location"
        } else {
            diagnostic.location.as_str()
        },
        diagnostic.reason.label(),
        diagnostic.detail
    );
}
