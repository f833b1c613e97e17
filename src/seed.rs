//! Catalog seeding: a deterministic company generator, CSV import and sample theses.

use std::collections::HashSet;
use std::io::Read;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use serde::Deserialize;
use thiserror::Error;

use crate::analysis::analyze_thesis;
use crate::entities::{
    company, investment_thesis, parse_category, FundingStage, Industry, RevenueRange,
};
use crate::matching::embedding::fnv1a;
use crate::matching::TextEmbedder;

const INSERT_CHUNK: usize = 50;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
    #[error("failed to serialize analysis: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A company row ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub name: String,
    pub description: String,
    pub industry: Industry,
    pub funding_stage: FundingStage,
    pub revenue_range: RevenueRange,
    pub website: Option<String>,
    pub founding_year: Option<i32>,
    pub employee_count: Option<i32>,
    pub headquarters: Option<String>,
    pub total_funding: Option<f64>,
}

impl NewCompany {
    pub fn profile_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name,
            self.description,
            self.industry.label(),
            self.funding_stage.label()
        )
    }

    fn into_active_model<E: TextEmbedder + ?Sized>(self, embedder: &E) -> Result<company::ActiveModel, SeedError> {
        let embedding = serde_json::to_string(&embedder.embed(&self.profile_text()))?;
        let now = Utc::now();
        Ok(company::ActiveModel {
            name: Set(self.name),
            description: Set(self.description),
            industry: Set(self.industry),
            funding_stage: Set(self.funding_stage),
            revenue_range: Set(self.revenue_range),
            website: Set(self.website),
            founding_year: Set(self.founding_year),
            employee_count: Set(self.employee_count),
            headquarters: Set(self.headquarters),
            total_funding: Set(self.total_funding),
            embedding_vector: Set(Some(embedding)),
            similarity_score: Set(0.0),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
    }
}

const NAME_STEMS: &[(Industry, &[&str])] = &[
    (Industry::Software, &["TechFlow", "DataSync", "CloudCore", "DevStack", "CodeCraft", "AppLogic", "ByteBridge", "SoftSphere", "LogicLabs", "CodeCanvas"]),
    (Industry::Fintech, &["PayFlow", "MoneyMesh", "LedgerLine", "BankBridge", "WealthWave", "InvestIQ", "CashConnect", "LendLogic", "ClearCoin", "TradeTrail"]),
    (Industry::Healthcare, &["MedMesh", "HealthHub", "BioBridge", "CareCore", "VitalView", "PharmaFlow", "ClinicCloud", "PulsePoint", "CureCraft", "WellPath"]),
    (Industry::Energy, &["GreenGrid", "SolarSync", "WindWave", "VoltVerse", "PowerPro", "CleanCore", "GridGenius", "CarbonCut", "SunStack", "EcoCell"]),
    (Industry::Education, &["LearnLogic", "SkillSync", "StudyStream", "EduWave", "LearnLink", "TutorTrack", "ClassCraft", "MentorMesh", "CourseCore", "SkillSphere"]),
    (Industry::Retail, &["ShopSync", "MarketMesh", "StoreStream", "CommerceCore", "CartCraft", "BasketBridge", "ShelfSmart", "RetailRise", "CheckoutIQ", "AisleOne"]),
    (Industry::Logistics, &["ShipSync", "FreightFlow", "RouteRight", "DockDesk", "CargoCore", "FleetFox", "HaulHub", "ParcelPath", "LoadLink", "PortPilot"]),
    (Industry::Cybersecurity, &["SecureSync", "CyberCore", "GuardGrid", "ShieldStream", "ThreatTrace", "VaultVerse", "ZeroGate", "CipherCell", "SentryStack", "LockLayer"]),
    (Industry::AiMl, &["NeuralNet", "BrainByte", "ModelMesh", "VisionVerse", "InferIQ", "TensorTrail", "SignalSense", "CortexCloud", "LatentLabs", "DeepDock"]),
    (Industry::Other, &["InnovateIO", "FutureFlow", "EliteEdge", "PrimePath", "NextNode", "WiseWave", "TrailTech", "NovaNest", "PivotPoint", "OrbitOps"]),
];

const DESCRIPTIONS: &[(Industry, &[&str])] = &[
    (Industry::Software, &[
        "Enterprise SaaS platform for business workflow automation",
        "Cloud-native developer platform with API-first integrations",
        "Application performance monitoring software for engineering teams",
        "Low-code platform for building internal enterprise applications",
        "Collaboration software for distributed product teams",
    ]),
    (Industry::Fintech, &[
        "Digital payments platform for small businesses",
        "Embedded banking infrastructure delivered through APIs",
        "Blockchain settlement network for cross-border payments",
        "Wealth management app for retail investors",
        "Credit underwriting platform for alternative lenders",
    ]),
    (Industry::Healthcare, &[
        "Telemedicine platform connecting patients with specialists",
        "Remote patient monitoring for chronic care management",
        "Clinical workflow software for hospitals and clinics",
        "Digital therapeutics for behavioral health",
        "Healthcare data analytics for payer and provider networks",
    ]),
    (Industry::Energy, &[
        "Solar project development and energy storage systems",
        "Smart grid software for utility load balancing",
        "Electric vehicle charging infrastructure network",
        "Carbon accounting platform for industrial emitters",
        "Battery chemistry for long-duration renewable storage",
    ]),
    (Industry::Education, &[
        "Online learning platform for professional upskilling",
        "Adaptive tutoring software for K-12 students",
        "Credentialing marketplace for vocational skills",
        "Language learning app with live coaching",
        "Learning management system for corporate training",
    ]),
    (Industry::Retail, &[
        "E-commerce storefront platform for direct-to-consumer brands",
        "Omnichannel inventory management for retailers",
        "Customer loyalty and engagement platform",
        "Marketplace for refurbished consumer electronics",
        "Point-of-sale system for specialty retail",
    ]),
    (Industry::Logistics, &[
        "Freight brokerage marketplace for trucking fleets",
        "Last-mile delivery routing and dispatch software",
        "Warehouse robotics for e-commerce fulfillment",
        "Supply chain visibility platform for shippers",
        "Cold chain monitoring for perishable goods transportation",
    ]),
    (Industry::Cybersecurity, &[
        "Zero trust network access for hybrid workforces",
        "Threat detection and response for cloud workloads",
        "Identity and access management for enterprises",
        "Application security testing integrated into CI pipelines",
        "Data privacy compliance automation platform",
    ]),
    (Industry::AiMl, &[
        "Machine learning platform for predictive analytics",
        "Computer vision for manufacturing quality inspection",
        "Conversational AI agents for customer support",
        "LLM tooling for enterprise document automation",
        "Deep learning models for medical imaging diagnostics",
    ]),
    (Industry::Other, &[
        "Digital transformation consulting for mid-market companies",
        "Innovation lab building products for emerging markets",
        "Research and development services for hardware startups",
        "Technology-enabled business process outsourcing",
        "Venture studio incubating vertical software companies",
    ]),
];

const NAME_SUFFIXES: &[&str] = &["", " Inc", " Labs", " Technologies", " Systems", " Group", " AI", " Solutions"];

const CITIES: &[&str] = &[
    "San Francisco, CA", "New York, NY", "Austin, TX", "Seattle, WA", "Boston, MA",
    "Denver, CO", "Chicago, IL", "Atlanta, GA", "Miami, FL", "Los Angeles, CA",
    "London, UK", "Berlin, Germany", "Toronto, Canada", "Singapore", "Tel Aviv, Israel",
];

/// Deterministic picker keyed by row index and field name.
fn pick<T: Copy>(index: usize, field: &str, options: &[T]) -> T {
    let hash = fnv1a(format!("{field}:{index}").as_bytes());
    options[(hash % options.len() as u64) as usize]
}

fn in_range(index: usize, field: &str, lo: i64, hi: i64) -> i64 {
    let hash = fnv1a(format!("{field}:{index}").as_bytes());
    lo + (hash % (hi - lo + 1) as u64) as i64
}

fn stems_for(industry: Industry) -> &'static [&'static str] {
    NAME_STEMS
        .iter()
        .find(|(i, _)| *i == industry)
        .map(|(_, stems)| *stems)
        .unwrap_or(&["Venture"])
}

fn descriptions_for(industry: Industry) -> &'static [&'static str] {
    DESCRIPTIONS
        .iter()
        .find(|(i, _)| *i == industry)
        .map(|(_, d)| *d)
        .unwrap_or(&["Technology company"])
}

/// Generates `count` companies. Same count, same catalog; names are unique.
pub fn generate_catalog(count: usize) -> Vec<NewCompany> {
    use sea_orm::Iterable;
    let industries: Vec<Industry> = Industry::iter().collect();
    let stages: Vec<FundingStage> = FundingStage::iter().collect();
    let revenues: Vec<RevenueRange> = RevenueRange::iter().collect();

    let mut seen = HashSet::with_capacity(count);
    (0..count)
        .map(|i| {
            let industry = industries[i % industries.len()];
            let funding_stage = pick(i, "stage", &stages);

            let base = format!(
                "{}{}",
                pick(i, "stem", stems_for(industry)),
                pick(i, "suffix", NAME_SUFFIXES)
            );
            let name = if seen.contains(&base) {
                format!("{} {}", base, i + 1)
            } else {
                base
            };
            seen.insert(name.clone());

            let (employees_lo, employees_hi, funding_lo, funding_hi) = match funding_stage {
                FundingStage::Seed => (5, 30, 1, 20),
                FundingStage::SeriesA => (20, 80, 20, 150),
                FundingStage::SeriesB => (60, 250, 150, 500),
                FundingStage::SeriesC => (150, 600, 500, 1500),
                FundingStage::SeriesD => (300, 1200, 1500, 5000),
                _ => (200, 5000, 100, 10000),
            };

            NewCompany {
                website: Some(format!(
                    "https://www.{}.com",
                    name.to_lowercase().replace(|c: char| !c.is_ascii_alphanumeric(), "")
                )),
                name,
                description: pick(i, "description", descriptions_for(industry)).to_string(),
                industry,
                funding_stage,
                revenue_range: pick(i, "revenue", &revenues),
                founding_year: Some(in_range(i, "founded", 1995, 2023) as i32),
                employee_count: Some(in_range(i, "employees", employees_lo, employees_hi) as i32),
                headquarters: Some(pick(i, "city", CITIES).to_string()),
                // tenths of a million
                total_funding: Some(in_range(i, "funding", funding_lo, funding_hi) as f64 / 10.0),
            }
        })
        .collect()
}

/// One row of a catalog CSV. Category columns use the stored string values.
#[derive(Debug, Deserialize)]
struct CsvCompany {
    name: String,
    description: String,
    industry: String,
    funding_stage: String,
    revenue_range: String,
    website: Option<String>,
    founding_year: Option<i32>,
    employee_count: Option<i32>,
    headquarters: Option<String>,
    total_funding: Option<f64>,
}

/// Reads companies from CSV with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<NewCompany>, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut companies = Vec::new();

    for (index, record) in csv_reader.deserialize::<CsvCompany>().enumerate() {
        let row = index + 2; // header is row 1
        let record = record?;
        let invalid = |reason: String| SeedError::InvalidRow { row, reason };

        if record.name.trim().is_empty() {
            return Err(invalid("name is empty".to_string()));
        }
        companies.push(NewCompany {
            industry: parse_category("industry", &record.industry).map_err(|e| invalid(e.to_string()))?,
            funding_stage: parse_category("funding_stage", &record.funding_stage)
                .map_err(|e| invalid(e.to_string()))?,
            revenue_range: parse_category("revenue_range", &record.revenue_range)
                .map_err(|e| invalid(e.to_string()))?,
            name: record.name,
            description: record.description,
            website: record.website.filter(|w| !w.is_empty()),
            founding_year: record.founding_year,
            employee_count: record.employee_count,
            headquarters: record.headquarters.filter(|h| !h.is_empty()),
            total_funding: record.total_funding,
        });
    }

    Ok(companies)
}

/// Inserts companies with precomputed embeddings, skipping names already present.
/// Returns how many rows were added.
pub async fn insert_companies<E: TextEmbedder + ?Sized>(
    db: &DatabaseConnection,
    embedder: &E,
    companies: Vec<NewCompany>,
) -> Result<u64, SeedError> {
    let before = company::Entity::find().count(db).await?;

    let mut models = Vec::with_capacity(companies.len());
    for new_company in companies {
        models.push(new_company.into_active_model(embedder)?);
    }

    for chunk in models.chunks(INSERT_CHUNK) {
        company::Entity::insert_many(chunk.to_vec())
            .on_conflict(OnConflict::column(company::Column::Name).do_nothing().to_owned())
            .do_nothing()
            .exec(db)
            .await?;
    }

    let after = company::Entity::find().count(db).await?;
    let inserted = after.saturating_sub(before);
    tracing::info!(inserted, total = after, "catalog seeded");
    Ok(inserted)
}

/// Seeds `count` generated companies when the catalog is empty.
pub async fn ensure_catalog<E: TextEmbedder + ?Sized>(
    db: &DatabaseConnection,
    embedder: &E,
    count: usize,
) -> Result<u64, SeedError> {
    let existing = company::Entity::find().count(db).await?;
    if existing > 0 {
        tracing::debug!(existing, "catalog already populated, skipping seed");
        return Ok(0);
    }
    insert_companies(db, embedder, generate_catalog(count)).await
}

pub const SAMPLE_THESES: &[(&str, &str)] = &[
    (
        "B2B SaaS with strong unit economics",
        "We invest in B2B SaaS companies with strong unit economics, proven product-market fit and recurring revenue. Target companies should be in the $5M-$50M ARR range with strong net revenue retention. We prefer experienced management teams with clear competitive moats.",
    ),
    (
        "Fintech disrupting banking and payments",
        "Seeking fintech companies disrupting traditional banking and payment systems. Focus on innovative technology, regulatory compliance and efficient customer acquisition. Target companies in Series A-C stages with $10M-$100M revenue.",
    ),
    (
        "AI in healthcare diagnostics",
        "Healthcare technology companies that improve patient outcomes and reduce costs. Focus on AI applications in diagnostics, telemedicine and care management. Seed to Series B companies with a clear regulatory pathway.",
    ),
    (
        "Cybersecurity against emerging threats",
        "Cybersecurity companies protecting against emerging threats with zero trust and identity solutions. Strong technical teams and proven demand. Companies with $5M-$50M revenue in Series B or Series C.",
    ),
    (
        "Scalable machine learning platforms",
        "AI/ML companies that solve real business problems with scalable machine learning. Proprietary models, data moats and clear commercial applications. Series A through Series C with proven product-market fit.",
    ),
];

/// Analyzes and stores the sample theses whose titles are not stored yet.
pub async fn insert_sample_theses(db: &DatabaseConnection) -> Result<usize, SeedError> {
    let mut created = 0;
    for (title, text) in SAMPLE_THESES {
        let exists = investment_thesis::Entity::find()
            .filter(investment_thesis::Column::Title.eq(*title))
            .count(db)
            .await?
            > 0;
        if exists {
            continue;
        }

        let analysis = analyze_thesis(text);
        let now = Utc::now();
        investment_thesis::ActiveModel {
            title: Set(title.to_string()),
            content: Set(text.to_string()),
            criteria: Set(serde_json::to_value(&analysis.criteria)?),
            analysis_summary: Set(analysis.summary),
            sentiment_score: Set(analysis.sentiment.score),
            confidence_score: Set(analysis.confidence_score),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created += 1;
    }
    tracing::info!(created, "sample theses stored");
    Ok(created)
}
