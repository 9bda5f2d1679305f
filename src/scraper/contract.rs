//! Page contracts: every selector and label the parsers depend on, grouped by
//! page type. When the site's markup drifts, this is the one place to change,
//! and tests can hand a parser a contract tailored to a fixture.

/// Confederation competitions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfederationContract {
    pub rows: &'static str,
    pub cell: &'static str,
    pub flag_image: &'static str,
    pub country_link: &'static str,
    pub link: &'static str,
}

/// A country's competitions page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalCompetitionsContract {
    pub boxes: &'static str,
    pub headline: &'static str,
    pub domestic_title: &'static str,
    pub table_body: &'static str,
    pub tier_cell: &'static str,
    pub link_cells: &'static str,
    pub excluded_tiers: &'static [&'static str],
}

/// Competition start page: the fixtures footer link and the club tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionContract {
    pub footer_links: &'static str,
    pub fixtures_link_texts: &'static [&'static str],
    pub tables: &'static str,
    pub table_headers: &'static str,
    pub club_header_word: &'static str,
    pub rows: &'static str,
    pub cells: &'static str,
    pub link: &'static str,
}

/// Participants (cup) or plus (league) listing of a competition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantsContract {
    pub table_links: &'static str,
    pub tooltip_links: &'static str,
    pub grid_keys: &'static str,
    pub placeholder_slug: &'static str,
}

/// Club start/squad page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubContract {
    pub market_value: &'static str,
    pub info_items: &'static str,
    pub squad_size_label: &'static str,
    pub average_age_label: &'static str,
    pub foreigners_label: &'static str,
    pub national_players_label: &'static str,
    pub stadium_label: &'static str,
    pub transfer_record_label: &'static str,
    pub coach: &'static str,
    pub canonical: &'static str,
    pub legal_name: &'static str,
    pub headline: &'static str,
    pub squad_rows: &'static str,
    pub shirt_number: &'static str,
    pub player_link: &'static str,
    pub position: &'static str,
    pub flags: &'static str,
    pub min_cells: usize,
    pub squad_player_links: &'static str,
}

/// Player profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerContract {
    pub headline: &'static str,
    pub labels: &'static str,
    pub birth_date: &'static str,
    pub image: &'static str,
    pub meta_description: &'static str,
    pub max_value: &'static str,
    pub scripts: &'static str,
    pub social_links: &'static str,
    pub agent_title: &'static str,
    pub name_in_home_country_label: &'static str,
    pub place_of_birth_label: &'static str,
    pub height_label: &'static str,
    pub citizenship_label: &'static str,
    pub position_label: &'static str,
    pub agent_label: &'static str,
    pub current_club_label: &'static str,
    pub foot_label: &'static str,
    pub joined_label: &'static str,
    pub contract_expires_label: &'static str,
    pub contract_extension_label: &'static str,
    pub outfitter_label: &'static str,
    pub social_media_label: &'static str,
    pub on_loan_from_label: &'static str,
    pub contract_option_label: &'static str,
    pub contract_there_expires_label: &'static str,
    pub death_labels: &'static [&'static str],
    pub deceased_placeholder: &'static str,
    pub deceased_club_path: &'static str,
    pub retired_path: &'static str,
    pub retired_word: &'static str,
}

/// Competition fixtures page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturesContract {
    pub game_links: &'static str,
    pub rows: &'static str,
    pub date_link: &'static str,
    pub kickoff: &'static str,
    pub home_link: &'static str,
    pub away_link: &'static str,
    pub unplayed_results: &'static [&'static str],
}

/// Game report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContract {
    pub game_box: &'static str,
    pub home_box: &'static str,
    pub away_box: &'static str,
    pub datetime_box: &'static str,
    pub date_link: &'static str,
    pub venue_box: &'static str,
    pub attendance_prefix: &'static str,
    pub referee_path: &'static str,
    pub result_box: &'static str,
    pub final_score: &'static str,
    pub halftime_score: &'static str,
    pub manager_label: &'static str,
    pub headline_class: &'static str,
    pub shootout_heading: &'static str,
    pub event_items: &'static str,
    pub minute_sprite_class: &'static str,
    pub event_player_class: &'static str,
    pub event_club_class: &'static str,
    pub event_action_class: &'static str,
    pub event_score_class: &'static str,
    pub substitution_out: &'static str,
    pub lineup_sections: &'static str,
    pub formation_container: &'static str,
    pub starting_players: &'static str,
    pub bench_rows: &'static str,
    pub bench_manager_row_class: &'static str,
}

/// Game line-ups page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupsContract {
    pub home_box: &'static str,
    pub away_box: &'static str,
    pub boxes: &'static str,
    pub headline: &'static str,
    pub starting_title: &'static str,
    pub substitutes_title: &'static str,
    pub rows: &'static str,
    pub shirt_number: &'static str,
    pub player_link: &'static str,
    pub position: &'static str,
    pub captain: &'static str,
}

impl ConfederationContract {
    pub const DEFAULT: Self = Self {
        rows: "table.items tbody tr.odd, table.items tbody tr.even",
        cell: "td",
        flag_image: "img",
        country_link: "table td a",
        link: "a",
    };
}

impl NationalCompetitionsContract {
    pub const DEFAULT: Self = Self {
        boxes: "div.box",
        headline: "h2.content-box-headline",
        domestic_title: "Domestic leagues & cups",
        table_body: "div.responsive-table tbody",
        tier_cell: "td",
        link_cells: "td table td",
        excluded_tiers: &["Domestic Cup", "Domestic Super Cup"],
    };
}

impl CompetitionContract {
    pub const DEFAULT: Self = Self {
        footer_links: "div.footer-links",
        fixtures_link_texts: &["All fixtures & results", "All games"],
        tables: "div.responsive-table",
        table_headers: "th",
        club_header_word: "club",
        rows: "tbody tr",
        cells: "td",
        link: "a",
    };
}

impl ParticipantsContract {
    pub const DEFAULT: Self = Self {
        table_links: "table.items td.links.hauptlink a",
        tooltip_links: "a.vereinprofil_tooltip",
        grid_keys: "div.grid-view div.keys span",
        placeholder_slug: "dummy-slug",
    };
}

impl ClubContract {
    pub const DEFAULT: Self = Self {
        market_value: "div.dataMarktwert a",
        info_items: "li",
        squad_size_label: "Squad size:",
        average_age_label: "Average age:",
        foreigners_label: "Foreigners:",
        national_players_label: "National team players:",
        stadium_label: "Stadium:",
        transfer_record_label: "Current transfer record:",
        coach: "div[data-viewport*='Mitarbeiter'] div.container-hauptinfo > a",
        canonical: "link[rel='canonical']",
        legal_name: "span[itemprop='legalName']",
        headline: "h1.data-header__headline-wrapper",
        squad_rows: "div.responsive-table table.items > tbody > tr",
        shirt_number: "div.rn_nummer",
        player_link: "td.posrela a[href*='/profil/spieler/']",
        position: "td.posrela tr:nth-child(2) td",
        flags: "img[title]",
        min_cells: 10,
        squad_player_links: "div.responsive-table table.inline-table td.hauptlink a",
    };
}

impl PlayerContract {
    pub const DEFAULT: Self = Self {
        headline: "h1.data-header__headline-wrapper",
        labels: "span",
        birth_date: "span[itemprop='birthDate']",
        image: "img.data-header__profile-image",
        meta_description: "meta[name='description']",
        max_value: "div.tm-player-market-value-development__max-value",
        scripts: "script",
        social_links: "div.socialmedia-icons a",
        agent_title: "span.cp",
        name_in_home_country_label: "Name in home country:",
        place_of_birth_label: "Place of birth:",
        height_label: "Height:",
        citizenship_label: "Citizenship:",
        position_label: "Position:",
        agent_label: "Player agent:",
        current_club_label: "Current club:",
        foot_label: "Foot:",
        joined_label: "Joined:",
        contract_expires_label: "Contract expires:",
        contract_extension_label: "Date of last contract extension:",
        outfitter_label: "Outfitter:",
        social_media_label: "Social-Media:",
        on_loan_from_label: "On loan from:",
        contract_option_label: "Contract option:",
        contract_there_expires_label: "Contract there expires:",
        death_labels: &["Date of death:", "Died on:"],
        deceased_placeholder: "---",
        deceased_club_path: "/-tm/startseite/verein/",
        retired_path: "/retired/",
        retired_word: "retired",
    };
}

impl FixturesContract {
    pub const DEFAULT: Self = Self {
        game_links: "a.ergebnis-link",
        rows: "table tbody tr",
        date_link: "a[href*='/datum/']",
        kickoff: "td.zentriert.hide-for-small",
        home_link: "td.text-right.no-border-rechts.hauptlink > a",
        away_link: "td.no-border-links.hauptlink > a",
        unplayed_results: &["-:-", "", "vs"],
    };
}

impl GameContract {
    pub const DEFAULT: Self = Self {
        game_box: "div.box-content",
        home_box: "div.sb-heim",
        away_box: "div.sb-gast",
        datetime_box: "div.sb-spieldaten",
        date_link: "a[href*='datum']",
        venue_box: "p.sb-zusatzinfos",
        attendance_prefix: "Attendance:",
        referee_path: "schiedsrichter",
        result_box: "div.ergebnis-wrap",
        final_score: "div.sb-endstand",
        halftime_score: "div.sb-halbzeit",
        manager_label: "Manager",
        headline_class: "content-box-headline",
        shootout_heading: "Penalty shoot-out",
        event_items: "div.sb-aktion",
        minute_sprite_class: "sb-sprite-uhr-klein",
        event_player_class: "sb-aktion-spielerbild",
        event_club_class: "sb-aktion-wappen",
        event_action_class: "sb-aktion-aktion",
        event_score_class: "sb-aktion-spielstand",
        substitution_out: "span.sb-aktion-wechsel-aus > span",
        lineup_sections: "div.large-6.columns",
        formation_container: "div.formation-player-container",
        starting_players: "div.formation-player-container span.formation-number-name a",
        bench_rows: "table.ersatzbank tr",
        bench_manager_row_class: "bench-table__tr",
    };
}

impl LineupsContract {
    pub const DEFAULT: Self = Self {
        home_box: "div.sb-heim a",
        away_box: "div.sb-gast a",
        boxes: "div.box",
        headline: "h2.content-box-headline",
        starting_title: "Starting Line-up",
        substitutes_title: "Substitutes",
        rows: "table.items > tbody > tr",
        shirt_number: "div.rn_nummer",
        player_link: "a[href*='/profil/spieler/']",
        position: "table.inline-table tr:nth-child(2) td",
        captain: "span.kapitaenicon-table",
    };
}

macro_rules! default_from_const {
    ($($contract:ty),+ $(,)?) => {
        $(
            impl Default for $contract {
                fn default() -> Self {
                    Self::DEFAULT
                }
            }
        )+
    };
}

default_from_const!(
    ConfederationContract,
    NationalCompetitionsContract,
    CompetitionContract,
    ParticipantsContract,
    ClubContract,
    PlayerContract,
    FixturesContract,
    GameContract,
    LineupsContract,
);

/// The full set of page contracts a crawl parses with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContracts {
    pub confederation: ConfederationContract,
    pub national_competitions: NationalCompetitionsContract,
    pub competition: CompetitionContract,
    pub participants: ParticipantsContract,
    pub club: ClubContract,
    pub player: PlayerContract,
    pub fixtures: FixturesContract,
    pub game: GameContract,
    pub lineups: LineupsContract,
}
