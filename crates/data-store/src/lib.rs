//! Flat-file persistence between pipeline stages. Tables go to CSV, nested
//! documents to JSON. Every write replaces the whole file; every read of a
//! missing file returns `Ok(None)` so stages can run in any order.

use screener_core::{
    CalendarDoc, CompositePick, EtfFlowCommentary, EtfFlowRecord, FinalReport,
    InsiderMovesDoc, InstitutionalRecord, MacroAnalysisDoc, OptionsFlowDoc, PortfolioRiskReport,
    ScreenerError, SectorHeatmapDoc, SummaryStore, VolumeAnalysisRecord,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const VOLUME_FILE: &str = "volume_analysis.csv";
const INSTITUTIONAL_FILE: &str = "institutional_analysis.csv";
const ETF_FLOWS_FILE: &str = "etf_flows.csv";
const PICKS_FILE: &str = "smart_money_picks.csv";
const ETF_COMMENTARY_FILE: &str = "etf_flow_commentary.json";
const INSIDER_FILE: &str = "insider_moves.json";
const OPTIONS_FILE: &str = "options_flow.json";
const RISK_FILE: &str = "portfolio_risk.json";
const HEATMAP_FILE: &str = "sector_heatmap.json";
const MACRO_FILE: &str = "macro_analysis.json";
const MACRO_EN_FILE: &str = "macro_analysis_en.json";
const CALENDAR_FILE: &str = "weekly_calendar.json";
const SUMMARIES_FILE: &str = "ai_summaries.json";
const REPORT_FILE: &str = "final_report.json";

/// Store rooted at one data directory.
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    /// Open a store, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ScreenerError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn write_csv<T: Serialize>(&self, name: &str, rows: &[T]) -> Result<(), ScreenerError> {
        let path = self.path(name);
        let mut writer =
            csv::Writer::from_path(&path).map_err(|e| ScreenerError::Storage(e.to_string()))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| ScreenerError::Storage(e.to_string()))?;
        }
        writer.flush()?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "table written");
        Ok(())
    }

    fn read_csv<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Vec<T>>, ScreenerError> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }
        let mut reader =
            csv::Reader::from_path(&path).map_err(|e| ScreenerError::Storage(e.to_string()))?;
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| ScreenerError::Storage(e.to_string()))?;
        Ok(Some(rows))
    }

    fn write_json<T: Serialize>(&self, name: &str, doc: &T) -> Result<(), ScreenerError> {
        let path = self.path(name);
        let body =
            serde_json::to_vec_pretty(doc).map_err(|e| ScreenerError::Storage(e.to_string()))?;
        fs::write(&path, body)?;
        tracing::debug!(path = %path.display(), "document written");
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ScreenerError> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }
        let body = fs::read(&path)?;
        let doc =
            serde_json::from_slice(&body).map_err(|e| ScreenerError::Storage(e.to_string()))?;
        Ok(Some(doc))
    }

    pub fn save_volume(&self, rows: &[VolumeAnalysisRecord]) -> Result<(), ScreenerError> {
        self.write_csv(VOLUME_FILE, rows)
    }

    pub fn load_volume(&self) -> Result<Option<Vec<VolumeAnalysisRecord>>, ScreenerError> {
        self.read_csv(VOLUME_FILE)
    }

    pub fn save_institutional(&self, rows: &[InstitutionalRecord]) -> Result<(), ScreenerError> {
        self.write_csv(INSTITUTIONAL_FILE, rows)
    }

    pub fn load_institutional(&self) -> Result<Option<Vec<InstitutionalRecord>>, ScreenerError> {
        self.read_csv(INSTITUTIONAL_FILE)
    }

    pub fn save_etf_flows(&self, rows: &[EtfFlowRecord]) -> Result<(), ScreenerError> {
        self.write_csv(ETF_FLOWS_FILE, rows)
    }

    pub fn load_etf_flows(&self) -> Result<Option<Vec<EtfFlowRecord>>, ScreenerError> {
        self.read_csv(ETF_FLOWS_FILE)
    }

    pub fn save_picks(&self, rows: &[CompositePick]) -> Result<(), ScreenerError> {
        self.write_csv(PICKS_FILE, rows)
    }

    pub fn load_picks(&self) -> Result<Option<Vec<CompositePick>>, ScreenerError> {
        self.read_csv(PICKS_FILE)
    }

    pub fn save_etf_commentary(&self, doc: &EtfFlowCommentary) -> Result<(), ScreenerError> {
        self.write_json(ETF_COMMENTARY_FILE, doc)
    }

    pub fn load_etf_commentary(&self) -> Result<Option<EtfFlowCommentary>, ScreenerError> {
        self.read_json(ETF_COMMENTARY_FILE)
    }

    pub fn save_insider_moves(&self, doc: &InsiderMovesDoc) -> Result<(), ScreenerError> {
        self.write_json(INSIDER_FILE, doc)
    }

    pub fn load_insider_moves(&self) -> Result<Option<InsiderMovesDoc>, ScreenerError> {
        self.read_json(INSIDER_FILE)
    }

    pub fn save_options_flow(&self, doc: &OptionsFlowDoc) -> Result<(), ScreenerError> {
        self.write_json(OPTIONS_FILE, doc)
    }

    pub fn load_options_flow(&self) -> Result<Option<OptionsFlowDoc>, ScreenerError> {
        self.read_json(OPTIONS_FILE)
    }

    pub fn save_portfolio_risk(&self, doc: &PortfolioRiskReport) -> Result<(), ScreenerError> {
        self.write_json(RISK_FILE, doc)
    }

    pub fn load_portfolio_risk(&self) -> Result<Option<PortfolioRiskReport>, ScreenerError> {
        self.read_json(RISK_FILE)
    }

    pub fn save_sector_heatmap(&self, doc: &SectorHeatmapDoc) -> Result<(), ScreenerError> {
        self.write_json(HEATMAP_FILE, doc)
    }

    pub fn load_sector_heatmap(&self) -> Result<Option<SectorHeatmapDoc>, ScreenerError> {
        self.read_json(HEATMAP_FILE)
    }

    /// Korean and English macro documents live in separate files.
    pub fn save_macro(&self, doc: &MacroAnalysisDoc) -> Result<(), ScreenerError> {
        let file = if doc.language == "en" { MACRO_EN_FILE } else { MACRO_FILE };
        self.write_json(file, doc)
    }

    pub fn load_macro(&self, language: &str) -> Result<Option<MacroAnalysisDoc>, ScreenerError> {
        let file = if language == "en" { MACRO_EN_FILE } else { MACRO_FILE };
        self.read_json(file)
    }

    pub fn save_calendar(&self, doc: &CalendarDoc) -> Result<(), ScreenerError> {
        self.write_json(CALENDAR_FILE, doc)
    }

    pub fn load_calendar(&self) -> Result<Option<CalendarDoc>, ScreenerError> {
        self.read_json(CALENDAR_FILE)
    }

    pub fn save_summaries(&self, store: &SummaryStore) -> Result<(), ScreenerError> {
        self.write_json(SUMMARIES_FILE, store)
    }

    pub fn load_summaries(&self) -> Result<Option<SummaryStore>, ScreenerError> {
        self.read_json(SUMMARIES_FILE)
    }

    pub fn save_final_report(&self, doc: &FinalReport) -> Result<(), ScreenerError> {
        self.write_json(REPORT_FILE, doc)
    }

    pub fn load_final_report(&self) -> Result<Option<FinalReport>, ScreenerError> {
        self.read_json(REPORT_FILE)
    }
}
