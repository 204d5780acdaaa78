/// One tracked ETF.
pub struct TrackedEtf {
    pub ticker: &'static str,
    pub name: &'static str,
    pub category: &'static str,
}

/// The 24 major ETFs tracked for fund-flow analysis.
pub const ETF_UNIVERSE: &[TrackedEtf] = &[
    // Broad market
    TrackedEtf { ticker: "SPY", name: "SPDR S&P 500", category: "Broad Market" },
    TrackedEtf { ticker: "QQQ", name: "Invesco QQQ Trust", category: "Broad Market" },
    TrackedEtf { ticker: "IWM", name: "iShares Russell 2000", category: "Broad Market" },
    TrackedEtf { ticker: "DIA", name: "SPDR Dow Jones", category: "Broad Market" },
    TrackedEtf { ticker: "VTI", name: "Vanguard Total Stock Market", category: "Broad Market" },
    // Sector
    TrackedEtf { ticker: "XLK", name: "Technology Select Sector", category: "Sector" },
    TrackedEtf { ticker: "XLF", name: "Financial Select Sector", category: "Sector" },
    TrackedEtf { ticker: "XLV", name: "Health Care Select Sector", category: "Sector" },
    TrackedEtf { ticker: "XLE", name: "Energy Select Sector", category: "Sector" },
    TrackedEtf { ticker: "XLY", name: "Consumer Discretionary", category: "Sector" },
    TrackedEtf { ticker: "XLP", name: "Consumer Staples", category: "Sector" },
    TrackedEtf { ticker: "XLI", name: "Industrials Select Sector", category: "Sector" },
    TrackedEtf { ticker: "XLB", name: "Materials Select Sector", category: "Sector" },
    TrackedEtf { ticker: "XLU", name: "Utilities Select Sector", category: "Sector" },
    TrackedEtf { ticker: "XLRE", name: "Real Estate Select Sector", category: "Sector" },
    TrackedEtf { ticker: "XLC", name: "Communication Services", category: "Sector" },
    // Commodities and alternatives
    TrackedEtf { ticker: "GLD", name: "SPDR Gold Trust", category: "Commodity" },
    TrackedEtf { ticker: "SLV", name: "iShares Silver Trust", category: "Commodity" },
    TrackedEtf { ticker: "USO", name: "United States Oil Fund", category: "Commodity" },
    TrackedEtf { ticker: "TLT", name: "iShares 20+ Year Treasury", category: "Fixed Income" },
    TrackedEtf { ticker: "HYG", name: "iShares High Yield Corporate Bond", category: "Fixed Income" },
    TrackedEtf { ticker: "EFA", name: "iShares MSCI EAFE", category: "International" },
    TrackedEtf { ticker: "EEM", name: "iShares MSCI Emerging Markets", category: "International" },
    TrackedEtf { ticker: "VEA", name: "Vanguard FTSE Developed Markets", category: "International" },
];
