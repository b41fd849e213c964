use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse grouping of zone labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCategory {
    General,
    Metadata,
    Body,
    References,
    Other,
}

impl LabelCategory {
    /// The label standing for the whole category.
    pub fn general_label(self) -> ZoneLabel {
        match self {
            LabelCategory::General | LabelCategory::Other => ZoneLabel::GenOther,
            LabelCategory::Metadata => ZoneLabel::GenMetadata,
            LabelCategory::Body => ZoneLabel::GenBody,
            LabelCategory::References => ZoneLabel::GenReferences,
        }
    }
}

/// Semantic tag of a zone. Declaration order is the stable ordinal used in
/// exported training samples, so new variants go at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneLabel {
    GenMetadata,
    GenBody,
    GenReferences,
    GenOther,

    MetAbstract,
    MetAffiliation,
    MetAccessData,
    MetBibInfo,
    MetAuthor,
    MetCorrespondence,
    MetDates,
    MetEditor,
    MetKeywords,
    MetTitle,
    MetType,
    MetCopyright,

    BodyContent,
    BodyGlossary,
    BodyEquation,
    BodyFigure,
    BodyTable,
    BodyAcknowledgment,
    BodyConflictStmt,

    References,

    OthPageNumber,
    OthUnknown,
}

impl ZoneLabel {
    pub const ALL: [ZoneLabel; 26] = [
        ZoneLabel::GenMetadata,
        ZoneLabel::GenBody,
        ZoneLabel::GenReferences,
        ZoneLabel::GenOther,
        ZoneLabel::MetAbstract,
        ZoneLabel::MetAffiliation,
        ZoneLabel::MetAccessData,
        ZoneLabel::MetBibInfo,
        ZoneLabel::MetAuthor,
        ZoneLabel::MetCorrespondence,
        ZoneLabel::MetDates,
        ZoneLabel::MetEditor,
        ZoneLabel::MetKeywords,
        ZoneLabel::MetTitle,
        ZoneLabel::MetType,
        ZoneLabel::MetCopyright,
        ZoneLabel::BodyContent,
        ZoneLabel::BodyGlossary,
        ZoneLabel::BodyEquation,
        ZoneLabel::BodyFigure,
        ZoneLabel::BodyTable,
        ZoneLabel::BodyAcknowledgment,
        ZoneLabel::BodyConflictStmt,
        ZoneLabel::References,
        ZoneLabel::OthPageNumber,
        ZoneLabel::OthUnknown,
    ];

    pub fn category(self) -> LabelCategory {
        use ZoneLabel::*;
        match self {
            GenMetadata | GenBody | GenReferences | GenOther => LabelCategory::General,
            MetAbstract | MetAffiliation | MetAccessData | MetBibInfo | MetAuthor
            | MetCorrespondence | MetDates | MetEditor | MetKeywords | MetTitle | MetType
            | MetCopyright => LabelCategory::Metadata,
            BodyContent | BodyGlossary | BodyEquation | BodyFigure | BodyTable
            | BodyAcknowledgment | BodyConflictStmt => LabelCategory::Body,
            References => LabelCategory::References,
            OthPageNumber | OthUnknown => LabelCategory::Other,
        }
    }

    /// General labels map to themselves.
    pub fn general_label(self) -> ZoneLabel {
        match self.category() {
            LabelCategory::General => self,
            category => category.general_label(),
        }
    }

    pub fn is_of_category_or_general(self, category: LabelCategory) -> bool {
        self.category() == category || self == category.general_label()
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        use ZoneLabel::*;
        match self {
            GenMetadata => "gen_metadata",
            GenBody => "gen_body",
            GenReferences => "gen_references",
            GenOther => "gen_other",
            MetAbstract => "met_abstract",
            MetAffiliation => "met_affiliation",
            MetAccessData => "met_access_data",
            MetBibInfo => "met_bib_info",
            MetAuthor => "met_author",
            MetCorrespondence => "met_correspondence",
            MetDates => "met_dates",
            MetEditor => "met_editor",
            MetKeywords => "met_keywords",
            MetTitle => "met_title",
            MetType => "met_type",
            MetCopyright => "met_copyright",
            BodyContent => "body_content",
            BodyGlossary => "body_glossary",
            BodyEquation => "body_equation",
            BodyFigure => "body_figure",
            BodyTable => "body_table",
            BodyAcknowledgment => "body_acknowledgment",
            BodyConflictStmt => "body_conflict_stmt",
            References => "references",
            OthPageNumber => "oth_page_number",
            OthUnknown => "oth_unknown",
        }
    }
}

impl fmt::Display for ZoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
