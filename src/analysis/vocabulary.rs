//! Fixed keyword vocabularies used by the extractor.

use crate::entities::{FundingStage, Industry, RevenueRange};

pub struct IndustryVocabulary {
    pub industry: Industry,
    /// Confidence assigned when every keyword in the list is present.
    pub base_confidence: f64,
    pub keywords: &'static [&'static str],
}

pub const INDUSTRY_VOCABULARY: &[IndustryVocabulary] = &[
    IndustryVocabulary {
        industry: Industry::Software,
        base_confidence: 0.9,
        keywords: &["software", "saas", "platform", "application", "enterprise", "cloud", "api", "microservices"],
    },
    IndustryVocabulary {
        industry: Industry::Fintech,
        base_confidence: 0.85,
        keywords: &["fintech", "financial", "banking", "payment", "blockchain", "crypto", "insurtech", "wealthtech"],
    },
    IndustryVocabulary {
        industry: Industry::Healthcare,
        base_confidence: 0.9,
        keywords: &["healthcare", "medical", "health", "biotech", "pharma", "telemedicine", "digital health", "patient"],
    },
    IndustryVocabulary {
        industry: Industry::Energy,
        base_confidence: 0.8,
        keywords: &["energy", "renewable", "solar", "wind", "cleantech", "sustainability", "carbon", "climate"],
    },
    IndustryVocabulary {
        industry: Industry::Education,
        base_confidence: 0.85,
        keywords: &["education", "edtech", "e-learning", "online learning", "students", "skill development", "upskilling"],
    },
    IndustryVocabulary {
        industry: Industry::Retail,
        base_confidence: 0.8,
        keywords: &["retail", "ecommerce", "e-commerce", "consumer", "marketplace", "omnichannel", "d2c"],
    },
    IndustryVocabulary {
        industry: Industry::Logistics,
        base_confidence: 0.85,
        keywords: &["logistics", "supply chain", "transportation", "warehouse", "fulfillment", "last mile", "freight"],
    },
    IndustryVocabulary {
        industry: Industry::Cybersecurity,
        base_confidence: 0.9,
        keywords: &["cybersecurity", "cyber", "security", "privacy", "threat", "zero trust", "identity"],
    },
    IndustryVocabulary {
        industry: Industry::AiMl,
        base_confidence: 0.95,
        keywords: &[
            "ai",
            "machine learning",
            "artificial intelligence",
            "ml",
            "deep learning",
            "neural networks",
            "llm",
            "computer vision",
        ],
    },
];

pub struct StageVocabulary {
    pub stage: FundingStage,
    pub keywords: &'static [&'static str],
}

pub const STAGE_VOCABULARY: &[StageVocabulary] = &[
    StageVocabulary { stage: FundingStage::Seed, keywords: &["seed", "pre-seed", "angel"] },
    StageVocabulary { stage: FundingStage::SeriesA, keywords: &["series a"] },
    StageVocabulary { stage: FundingStage::SeriesB, keywords: &["series b"] },
    StageVocabulary { stage: FundingStage::SeriesC, keywords: &["series c"] },
    StageVocabulary { stage: FundingStage::SeriesD, keywords: &["series d"] },
    StageVocabulary { stage: FundingStage::Ipo, keywords: &["ipo", "pre-ipo", "public offering"] },
    StageVocabulary {
        stage: FundingStage::Public,
        keywords: &["publicly traded", "public companies", "listed companies"],
    },
    StageVocabulary {
        stage: FundingStage::Private,
        keywords: &["private companies", "privately held"],
    },
];

pub struct RevenueVocabulary {
    pub range: RevenueRange,
    pub keywords: &'static [&'static str],
}

/// Phrase cues; numeric amounts are parsed separately.
pub const REVENUE_VOCABULARY: &[RevenueVocabulary] = &[
    RevenueVocabulary { range: RevenueRange::Under1M, keywords: &["pre-revenue", "early revenue", "under 1m"] },
    RevenueVocabulary { range: RevenueRange::From1To5M, keywords: &["1-5m", "1m to 5m"] },
    RevenueVocabulary { range: RevenueRange::From5To20M, keywords: &["5-20m", "5m to 20m"] },
    RevenueVocabulary { range: RevenueRange::From20To100M, keywords: &["20-100m", "20m to 100m"] },
    RevenueVocabulary { range: RevenueRange::Over100M, keywords: &["100m+", "nine-figure revenue"] },
];

/// Words that mark a sentence as talking about revenue.
pub const REVENUE_CONTEXT: &[&str] = &["revenue", "arr", "mrr", "sales", "run-rate", "run rate", "turnover", "bookings"];

pub const BUSINESS_MODELS: &[(&str, &[&str])] = &[
    ("B2B", &["b2b", "business-to-business"]),
    ("B2C", &["b2c", "consumer-facing", "business-to-consumer"]),
    ("SaaS", &["saas", "software as a service"]),
    ("Marketplace", &["marketplace", "two-sided"]),
    ("Subscription", &["subscription", "recurring revenue"]),
    ("Freemium", &["freemium", "product-led"]),
    ("Transaction-based", &["transaction fees", "take rate", "transaction-based"]),
    ("Licensing", &["licensing", "license fees"]),
];

pub const REGIONS: &[(&str, &[&str])] = &[
    ("North America", &["usa", "united states", "canada", "north america", "silicon valley"]),
    ("Europe", &["europe", "european", "uk", "germany", "france", "nordics"]),
    ("Asia Pacific", &["asia", "apac", "china", "india", "japan", "singapore", "australia"]),
    ("Latin America", &["latin america", "latam", "brazil", "mexico", "argentina"]),
    ("Middle East", &["middle east", "mena", "uae", "saudi arabia", "israel"]),
];

pub const POSITIVE_WORDS: &[&str] = &[
    "growth", "opportunity", "potential", "strong", "excellent", "innovative", "leading",
    "successful", "profitable", "scalable", "proven", "resilient", "efficient", "attractive",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "risk", "concern", "challenge", "difficult", "uncertain", "volatile", "declining", "weak",
    "struggling", "failing", "risky", "unproven", "saturated", "losses",
];

pub const RISK_PHRASES: &[&str] = &[
    "high risk",
    "volatile",
    "uncertain",
    "unproven",
    "experimental",
    "early stage",
    "unregulated",
    "competitive",
    "saturated market",
];

pub const MARKET_TIMING: &[(&str, &[&str])] = &[
    ("early_adopter", &["early", "pioneer", "first mover", "emerging"]),
    ("growth_phase", &["growth", "scaling", "expansion", "momentum"]),
    ("mature_market", &["mature", "established", "consolidation", "saturated"]),
    ("recession_resistant", &["recession", "downturn", "resilient", "defensive"]),
];

pub const COMPETITIVE_LANDSCAPE: &[(&str, &[&str])] = &[
    ("high_competition", &["competitive", "crowded", "saturated", "many players"]),
    ("low_competition", &["unique", "niche", "unserved", "blue ocean"]),
    ("barriers_to_entry", &["barriers", "moat", "proprietary", "patent"]),
    ("network_effects", &["network", "platform", "ecosystem", "community"]),
];
