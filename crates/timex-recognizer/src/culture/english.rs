//! English (`en-us`) patterns, tables and hooks.

use std::collections::HashMap;

use chrono::Weekday;
use regex::Regex;

use super::{
    compile, normalize_key, Culture, CultureConfig, DatePeriodRegexes, DateRegexes,
    DateTimePeriodRegexes, DateTimeRegexes, DurationRegexes, NumberCapability, RelativeWords,
    Tables, TimeAdjuster, TimeAdjustment, TimePeriodRegexes, TimeRegexes, UtilityRegexes,
    DEFAULT_CULTURE,
};
use crate::error::Result;
use crate::number::{
    spelled_integer_pattern, spelled_ordinal_pattern, EnglishNumberExtractor, EnglishNumberParser,
    NumberMode,
};

// ── Pattern fragments ───────────────────────────────────────────────────────
//
// Templates below refer to these as `<NAME>`; alternations are ordered
// longest first so a short form never shadows a long one.

const WEEKDAY: &str = "sunday|monday|tuesday|wednesday|thursday|friday|saturday|tues|thurs|thur|mon|tue|wed|thu|fri|sat|sun";
const FULL_WEEKDAY: &str = "sunday|monday|tuesday|wednesday|thursday|friday|saturday|tues|thurs";
const MONTH: &str = "january|february|march|april|may|june|july|august|september|october|november|december|sept|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec";
const DAY_NUM: &str = r"(?:3[01]|[12]\d|0?[1-9])";
const MONTH_NUM: &str = r"(?:1[0-2]|0?[1-9])";
const YEAR4: &str = r"(?:1[5-9]\d{2}|20\d{2}|2100)";
const DESC: &str = r"(?:[ap]\.\s?m\.|[ap]\.\s?m\b|[ap]m\b)";
const HOUR_NUM: &str = r"(?:2[0-4]|[01]?\d)";
const HOUR_WORDS: &str = "twelve|eleven|ten|nine|eight|seven|six|five|four|three|two|one|zero";
const UNIT_WORDS: &str = "one|two|three|four|five|six|seven|eight|nine";
const TEEN_WORDS: &str = "nineteen|eighteen|seventeen|sixteen|fifteen|fourteen|thirteen|twelve|eleven|ten";
const TILL: &str = r"(?:to|till|til|until|thru|through|-|–|—|~)";
const DURATION_UNIT: &str = "years|year|yrs|yr|months|month|weeks|week|wks|wk|days|day|hours|hour|hrs|hr|h|minutes|minute|mins|min|seconds|second|secs|sec";
const CARDINAL_1_5: &str = "first|second|third|fourth|fifth|last|1st|2nd|3rd|4th|5th";
const TIME_SUFFIX: &str = r"(?:in\s+the\s+)?morning|(?:(?:at|in|around|on|for)\s+(?:the\s+)?)?(?:afternoon|evening|midnight|lunchtime)|(?:at|in|around|on|for)\s+(?:the\s+)?night";

struct Fragments {
    pairs: Vec<(&'static str, String)>,
}

impl Fragments {
    fn english() -> Self {
        let ordinal_word = spelled_ordinal_pattern();
        let number_word = spelled_integer_pattern();
        let day = format!(r"(?:{DAY_NUM}(?:st|nd|rd|th)?|{ordinal_word})");
        let day_digits = format!(r"{DAY_NUM}(?:st|nd|rd|th)?");
        let minute_words = format!(
            r"(?:(?:twenty|thirty|forty|fifty)(?:[\s-](?:{UNIT_WORDS}))?|{TEEN_WORDS}|{UNIT_WORDS})"
        );
        let time_prefix = format!(
            r"half\s+past|(?:a\s+)?quarter\s+(?:past|to|after|before|til)|three\s+quarters?\s+(?:past|to|after|before|til)|(?:\d{{1,2}}|{minute_words})\s+(?:minutes?\s+)?(?:past|to|after|before|til)"
        );
        Self {
            pairs: vec![
                ("<FULL_WEEKDAY>", FULL_WEEKDAY.to_string()),
                ("<WEEKDAY>", WEEKDAY.to_string()),
                ("<MONTH_NUM>", MONTH_NUM.to_string()),
                ("<MONTH>", MONTH.to_string()),
                ("<DAY_NUM>", DAY_NUM.to_string()),
                ("<DAY_DIGITS>", day_digits),
                ("<DAY>", day),
                ("<ORDINAL_WORD>", ordinal_word),
                ("<NUMBER_WORD>", number_word),
                ("<YEAR4>", YEAR4.to_string()),
                ("<DESC>", DESC.to_string()),
                ("<HOUR_NUM>", HOUR_NUM.to_string()),
                ("<HOUR_WORDS>", HOUR_WORDS.to_string()),
                ("<UNIT_WORDS>", UNIT_WORDS.to_string()),
                ("<TEEN_WORDS>", TEEN_WORDS.to_string()),
                ("<TIME_PREFIX>", time_prefix),
                ("<TIME_SUFFIX>", TIME_SUFFIX.to_string()),
                ("<TILL>", TILL.to_string()),
                ("<DURATION_UNIT>", DURATION_UNIT.to_string()),
                ("<CARDINAL>", CARDINAL_1_5.to_string()),
            ],
        }
    }

    fn expand(&self, template: &str) -> String {
        self.pairs
            .iter()
            .fold(template.to_string(), |acc, (key, value)| acc.replace(key, value))
    }

    fn re(&self, name: &'static str, template: &str) -> Result<Regex> {
        compile(name, &self.expand(template))
    }

    fn list(&self, name: &'static str, templates: &[&str]) -> Result<Vec<Regex>> {
        templates.iter().map(|t| self.re(name, t)).collect()
    }
}

// ── Regex bundles ───────────────────────────────────────────────────────────

fn utility(f: &Fragments) -> Result<UtilityRegexes> {
    Ok(UtilityRegexes {
        ago: f.re(
            "utility.ago",
            r"^\s*(?:ago|before\s+(?:now|today)|earlier)\b",
        )?,
        later: f.re(
            "utility.later",
            r"^\s*(?:later|from\s+(?:now|today)|after\s+(?:now|today)|hence)\b",
        )?,
        in_connector: f.re("utility.in_connector", r"\bin\s*$")?,
        strict_relative: f.re(
            "utility.strict_relative",
            r"\b(?P<order>next|last|this|previous|coming|upcoming)\b",
        )?,
        relative_word: f.re(
            "utility.relative_word",
            r"\b(?P<order>next|following|coming|upcoming|last|previous|past|this|current)\b",
        )?,
        range_connector_symbol: f.re("utility.range_connector_symbol", r"^\s*(?:-|–|—|~)+\s*")?,
        till: f.re("utility.till", r"^<TILL>$")?,
        range_and: f.re("utility.range_and", r"^and$")?,
        from_prefix: f.re("utility.from_prefix", r"\bfrom\s*$")?,
        between_prefix: f.re("utility.between_prefix", r"\bbetween\s*$")?,
        past_prefix: f.re(
            "utility.past_prefix",
            r"\b(?:(?:in|during|over|for)\s+)?(?:the\s+)?(?:past|last|previous|preceding|recent)\s*$",
        )?,
        future_prefix: f.re(
            "utility.future_prefix",
            r"\b(?:(?:in|during|over|for|within)\s+)?(?:the\s+)?(?:next|coming|upcoming|following)\s*$",
        )?,
    })
}

fn duration(f: &Fragments) -> Result<DurationRegexes> {
    let suffix_and = r"(?P<suffix>\s*and\s+(?:an?\s+)?(?P<suffix_num>half|quarter))";
    let unit = format!(r"(?P<unit><DURATION_UNIT>)\b{suffix_and}?");
    Ok(DurationRegexes {
        followed_unit: f.re("duration.followed_unit", &format!(r"^\s*{unit}"))?,
        number_combined_with_unit: f.re(
            "duration.number_combined_with_unit",
            &format!(r"\b(?P<num>\d+(?:\.\d+)?){unit}"),
        )?,
        an_unit: f.re(
            "duration.an_unit",
            &format!(r"\b(?:(?P<half>half\s+)?an?|another)\s+{unit}"),
        )?,
        half_unit: f.re(
            "duration.half_unit",
            r"\b(?:an?\s+)?(?P<half>half)[\s-]+(?:an?\s+)?(?P<unit>year|month|week|day|hour|minute)\b",
        )?,
        all_unit: f.re(
            "duration.all_unit",
            r"\b(?:all|whole|entire|full)\s+(?:the\s+)?(?P<unit>year|month|week|day)\b",
        )?,
        inexact_number_unit: f.re(
            "duration.inexact_number_unit",
            &format!(r"\b(?:(?:a\s+)?few|several|(?P<two>(?:a\s+)?couple(?:\s+of)?))\s+{unit}"),
        )?,
        relative_unit: f.re(
            "duration.relative_unit",
            r"\b(?:this|next|last|past|previous|coming|upcoming|following)\s+(?P<unit>year|month|week|day|hour|minute|second)\b",
        )?,
        more_than: f.re(
            "duration.more_than",
            r"\b(?:more\s+than|over|longer\s+than|at\s+least)\s*$",
        )?,
        less_than: f.re(
            "duration.less_than",
            r"\b(?:less\s+than|under|shorter\s+than|at\s+most|up\s+to)\s*$",
        )?,
    })
}

fn date(f: &Fragments) -> Result<DateRegexes> {
    Ok(DateRegexes {
        basic: f.list(
            "date.basic",
            &[
                // July 4th, 2024 / Friday, July 5
                r"\b(?:(?P<weekday><WEEKDAY>)\s*,?\s*(?:the\s+)?)?(?P<month><MONTH>)\b\.?\s*[/\\.,\-]?\s*(?:the\s+)?(?P<day><DAY>)(?:\s*,?\s*(?:of\s+)?(?P<year><YEAR4>))?\b",
                // the 4th of July 2024
                r"\b(?:(?P<weekday><WEEKDAY>)\s*,?\s*)?(?:the\s+)?(?P<day><DAY>)\s*(?:of\s+|[/\\.\-]\s*)?(?P<month><MONTH>)\b\.?(?:\s*,?\s*(?P<year><YEAR4>))?\b",
                // 7/4/2024
                r"\b(?P<month><MONTH_NUM>)\s*[/\\\-.]\s*(?P<day><DAY_NUM>)\s*[/\\\-.]\s*(?P<year><YEAR4>|\d{2})\b",
                // 4/7/2024
                r"\b(?P<day><DAY_NUM>)\s*[/\\\-.]\s*(?P<month><MONTH_NUM>)\s*[/\\\-.]\s*(?P<year><YEAR4>|\d{2})\b",
                // 2024-07-04
                r"\b(?P<year><YEAR4>)\s*[/\\\-.]\s*(?P<month><MONTH_NUM>)\s*[/\\\-.]\s*(?P<day><DAY_NUM>)\b",
                // 7/4
                r"\b(?P<month><MONTH_NUM>)/(?P<day><DAY_NUM>)\b",
                // on 7-4
                r"\b(?:on|at)\s+(?P<token>(?P<month><MONTH_NUM>)[\-.](?P<day><DAY_NUM>))\b",
            ],
        )?,
        month_day_dash: f.re(
            "date.month_day_dash",
            r"^\s*(?P<month><MONTH_NUM>)[\-.](?P<day><DAY_NUM>)\b",
        )?,
        on: f.re("date.on", r"\bon\s+(?P<token>(?P<day><DAY_DIGITS>))\b")?,
        relaxed_on: f.re(
            "date.relaxed_on",
            r"\b(?:on|at|in)\s+(?:the\s+)?(?P<token>(?P<day><DAY_NUM>(?:st|nd|rd|th)))\b",
        )?,
        the_nth: f.re(
            "date.the_nth",
            r"\b(?P<token>the\s+(?P<day><DAY_NUM>(?:st|nd|rd|th)))\b",
        )?,
        special_day: f.re(
            "date.special_day",
            r"\b(?P<special>(?:the\s+)?day\s+after\s+tomorrow|(?:the\s+)?day\s+before\s+yesterday|(?:the\s+)?(?:next|following)\s+day|(?:the\s+)?previous\s+day|today|tomorrow|tmr|yesterday)\b",
        )?,
        special_day_with_num: f.re(
            "date.special_day_with_num",
            r"\b(?P<number>\d{1,2}|<NUMBER_WORD>)\s+days?\s+from\s+(?P<special>today|tomorrow|tmr|yesterday)\b",
        )?,
        relative_week_day: f.re(
            "date.relative_week_day",
            r"\b(?P<number>\d{1,2}|<NUMBER_WORD>)\s+(?P<weekday><WEEKDAY>)s?\s+(?:from\s+now|later)\b",
        )?,
        next_weekday: f.re(
            "date.next_weekday",
            r"\b(?:(?:this\s+)?coming|next|upcoming)\s+(?P<weekday><WEEKDAY>)\b",
        )?,
        this_weekday: f.re("date.this_weekday", r"\bthis\s+(?P<weekday><WEEKDAY>)\b")?,
        last_weekday: f.re(
            "date.last_weekday",
            r"\b(?:last|previous|past)\s+(?P<weekday><WEEKDAY>)\b",
        )?,
        bare_weekday: f.re("date.bare_weekday", r"\b(?P<weekday><FULL_WEEKDAY>)\b")?,
        week_day_of_month: f.re(
            "date.week_day_of_month",
            r"\b(?:the\s+)?(?P<cardinal><CARDINAL>)\s+(?P<weekday><WEEKDAY>)\s+(?:of|in)\s+(?:(?P<month><MONTH>)\b(?:\s*,?\s*(?P<year><YEAR4>)\b)?|(?:the\s+)?(?P<relmonth>(?P<order>this|next|last|previous|following)\s+month)\b)",
        )?,
        for_the: f.re(
            "date.for_the",
            r"\b(?:for|on)\s+(?P<token>the\s+(?P<dom><DAY_NUM>(?:st|nd|rd|th)|<ORDINAL_WORD>))(?P<end>\s*(?:[,.!?]|$))",
        )?,
        weekday_and_day_of_month: f.re(
            "date.weekday_and_day_of_month",
            r"\b(?P<weekday><WEEKDAY>)\s+(?:the\s+)?(?P<dom><DAY_NUM>(?:st|nd|rd|th)|<ORDINAL_WORD>)\b",
        )?,
        month_end: f.re(
            "date.month_end",
            r"\b(?P<month><MONTH>)\b\.?\s*(?:the\s*)?$",
        )?,
        of_month: f.re("date.of_month", r"^\s*(?:day\s+)?of\s+(?P<month><MONTH>)\b")?,
        relative_month_suffix: f.re(
            "date.relative_month_suffix",
            r"^\s*(?:(?:day\s+)?of\s+)?(?P<relmonth>(?P<order>this|next|last|previous|following)\s+month)\b",
        )?,
        week_day_start: f.re("date.week_day_start", r"^\s*(?P<weekday><WEEKDAY>)\b")?,
        single_number: f.re(
            "date.single_number",
            r"\b(?:(?:on|for)\s+)?(?:the\s+)?(?:<DAY>|<NUMBER_WORD>)\b",
        )?,
    })
}

fn time(f: &Fragments) -> Result<TimeRegexes> {
    Ok(TimeRegexes {
        basic: f.list(
            "time.basic",
            &[
                // 10:30, 10:30:15 pm
                r"\b(?P<hour><HOUR_NUM>):(?P<min>[0-5]\d)(?::(?P<sec>[0-5]\d))?(?:\s*(?P<desc><DESC>)|\b)",
                // 5pm
                r"\b(?P<hour><HOUR_NUM>)\s*(?P<desc><DESC>)",
                // five o'clock
                r"\b(?:(?P<hour><HOUR_NUM>)|(?P<hournum><HOUR_WORDS>))\s*o['’]?\s*clock\b(?:\s*(?P<desc><DESC>))?",
                // five pm
                r"\b(?P<hournum><HOUR_WORDS>)\s*(?P<desc><DESC>)",
                // seven thirty, nine oh five
                r"\b(?P<engtime>(?P<hournum><HOUR_WORDS>)\s+(?:(?P<tens>twenty|thirty|forty|fifty)(?:[\s-]+(?P<minnum><UNIT_WORDS>))?|(?P<teen><TEEN_WORDS>)|oh?[\s-]+(?P<ohmin><UNIT_WORDS>)))\b(?:\s*(?P<desc><DESC>))?",
                // half past five, 10 minutes to 6
                r"\b(?P<prefix><TIME_PREFIX>)\s+(?:(?P<hour><HOUR_NUM>)|(?P<hournum><HOUR_WORDS>))(?:\s*o['’]?\s*clock)?(?:\s*(?P<desc><DESC>)|\b)",
                // 5 in the morning
                r"\b(?:(?P<hour><HOUR_NUM>)(?::(?P<min>[0-5]\d))?|(?P<hournum><HOUR_WORDS>))(?:\s*o['’]?\s*clock)?\s+(?P<suffix><TIME_SUFFIX>)\b",
                // noon, midnight
                r"\b(?P<mid>(?P<midnight>mid\s*-?\s*night)|(?P<midmorning>mid\s*-?\s*morning)|(?P<midafternoon>mid\s*-?\s*afternoon)|(?P<midday>mid\s*-?\s*day|noon))\b",
            ],
        )?,
        at: f.re(
            "time.at",
            r"(?:\b(?:at|around)\s+|@\s*)(?P<token>(?:(?P<hour><HOUR_NUM>)|(?P<hournum><HOUR_WORDS>))(?:\s*(?:(?P<iam>a)|(?P<ipm>p))\b)?)\b",
        )?,
        ish: f.re(
            "time.ish",
            r"\b(?:(?P<hour><HOUR_NUM>)\s*-?\s*ish|(?P<noon>noon\s*-?\s*ish))\b",
        )?,
    })
}

fn time_period(f: &Fragments) -> Result<TimePeriodRegexes> {
    let hour1 = r"(?:(?P<hour1><HOUR_NUM>)(?::(?P<min1>[0-5]\d))?|(?P<hournum1><HOUR_WORDS>))";
    let hour2 = r"(?:(?P<hour2><HOUR_NUM>)(?::(?P<min2>[0-5]\d))?|(?P<hournum2><HOUR_WORDS>))";
    Ok(TimePeriodRegexes {
        from_to: f.re(
            "time_period.from_to",
            &format!(
                r"\b(?:(?P<from>from)\s+)?{hour1}(?:\s*(?P<desc1><DESC>))?\s*<TILL>\s*{hour2}(?:\s*(?P<desc2><DESC>)|\b)"
            ),
        )?,
        between_and: f.re(
            "time_period.between_and",
            &format!(
                r"\bbetween\s+{hour1}(?:\s*(?P<desc1><DESC>))?\s*and\s*{hour2}(?:\s*(?P<desc2><DESC>)|\b)"
            ),
        )?,
        time_of_day: f.re(
            "time_period.time_of_day",
            r"\b(?:(?:in|during)\s+the\s+)?(?:(?P<early>early)|(?P<late>late))?[\s-]*(?P<tod>morning|afternoon|evening|night|daytime|business\s+hours)\b",
        )?,
    })
}

fn date_period(f: &Fragments) -> Result<DatePeriodRegexes> {
    let day1 = r"(?P<day1><DAY_DIGITS>)";
    let day2 = r"(?P<day2><DAY_DIGITS>)";
    let year = r"(?:\s*,?\s*(?P<year><YEAR4>)\b)?";
    Ok(DatePeriodRegexes {
        simple: f.list(
            "date_period.simple",
            &[
                &format!(
                    r"\b(?:(?P<from>from)\s+)?(?P<month><MONTH>)\b\.?\s*(?:the\s+)?{day1}\s*<TILL>\s*(?:the\s+)?{day2}\b{year}"
                ),
                &format!(
                    r"\b(?:(?P<from>from)\s+)?(?:the\s+)?{day1}\s*<TILL>\s*(?:the\s+)?{day2}\s+(?:of\s+)?(?P<month><MONTH>)\b{year}"
                ),
                &format!(
                    r"\bbetween\s+(?P<month><MONTH>)\b\.?\s*(?:the\s+)?{day1}\s+and\s+(?:the\s+)?{day2}\b{year}"
                ),
                &format!(
                    r"\bbetween\s+(?:the\s+)?{day1}\s+and\s+(?:the\s+)?{day2}\s+(?:of\s+)?(?P<month><MONTH>)\b{year}"
                ),
            ],
        )?,
        month_with_year: f.list(
            "date_period.month_with_year",
            &[
                r"\b(?:(?:the\s+)?month\s+of\s+)?(?P<month><MONTH>)\b\.?(?:\s*,?\s*|\s+(?:of|in)\s+)(?:(?P<year><YEAR4>)|(?P<order>next|last|this|previous|following)\s+year)\b",
                r"\b(?P<month><MONTH_NUM>)\s*/\s*(?P<year><YEAR4>)\b",
            ],
        )?,
        month_to_month: f.list(
            "date_period.month_to_month",
            &[
                &format!(
                    r"\b(?:(?P<from>from)\s+)?(?P<month1><MONTH>)\b\s*<TILL>\s*(?P<month2><MONTH>)\b{year}"
                ),
                &format!(r"\bbetween\s+(?P<month1><MONTH>)\b\s+and\s+(?P<month2><MONTH>)\b{year}"),
            ],
        )?,
        year: f.re(
            "date_period.year",
            r"\b(?:(?:(?P<early>early|beginning\s+of|start\s+of)|(?P<mid>middle\s+of|mid)|(?P<late>late|end\s+of))[\s-]*)?(?:(?:the\s+)?year\s+)?(?P<year>\d{4})\b",
        )?,
        one_word: f.re(
            "date_period.one_word",
            r"\b(?:(?P<relearly>earlier(?:\s+in)?)|(?P<rellate>later(?:\s+in)?)|(?P<early>early|beginning\s+of|start\s+of)|(?P<mid>middle\s+of|mid)|(?P<late>late|end\s+of))?[\s-]*(?:(?:the\s+)?(?:month\s+of\s+)?(?:(?P<mrel>next|last|this|previous)\s+)?(?P<month><MONTH>)|(?:(?P<the>the)\s+)?(?:(?P<rel>next|following|coming|upcoming|last|previous|past|this|current)\s+)?(?P<unit>week\s*-?\s*end|week|month|year))\b",
        )?,
        to_date: f.re(
            "date_period.to_date",
            r"\b(?:(?:the\s+)?(?P<todate>year|month)[\s-]+to[\s-]+date|(?P<ytd>ytd)|(?P<mtd>mtd))\b",
        )?,
        week_of_month: f.re(
            "date_period.week_of_month",
            r"\b(?:the\s+)?(?P<cardinal><CARDINAL>)\s+week\s+(?:of|in)\s+(?:(?P<month><MONTH>)\b(?:\s*,?\s*(?P<year><YEAR4>)\b)?|(?:the\s+)?(?P<order>this|next|last|previous|following)\s+month\b)",
        )?,
        week_of_year: f.re(
            "date_period.week_of_year",
            r"\b(?:the\s+)?(?P<cardinal><CARDINAL>)\s+week\s+(?:of|in)\s+(?:(?:the\s+)?year\s+)?(?:(?P<year><YEAR4>)\b|(?:the\s+)?(?P<order>this|next|last|previous|following)\s+year\b)",
        )?,
        half_year: f.list(
            "date_period.half_year",
            &[
                r"\b(?:the\s+)?(?P<cardinal>first|second|1st|2nd)\s+half\s+(?:of\s+)?(?:the\s+)?(?:(?:year\s+)?(?P<year><YEAR4>)\b|(?P<order>this|next|last|previous|following)\s+year\b)",
                r"\bH(?P<number>[12])\s*,?\s*(?P<year><YEAR4>)\b",
            ],
        )?,
        quarter: f.list(
            "date_period.quarter",
            &[
                r"\b(?:the\s+)?(?P<cardinal>first|second|third|fourth|1st|2nd|3rd|4th)\s+quarter\s*(?:of|in|,)?\s*(?:the\s+)?(?:(?:year\s+)?(?P<year><YEAR4>)\b|(?P<order>this|next|last|previous|following)\s+year\b)",
                r"\b(?:the\s+)?(?P<cardinal>first|second|third|fourth|1st|2nd|3rd|4th)\s+quarter\b",
                r"\bQ(?P<number>[1-4])(?:\s*,?\s*(?P<year><YEAR4>))?\b",
                r"\b(?P<year><YEAR4>)\s*-?\s*Q(?P<number>[1-4])\b",
            ],
        )?,
        relative_quarter: f.re(
            "date_period.relative_quarter",
            r"\b(?P<order>this|next|last|previous|coming|past|current)\s+(?:(?P<count>\d{1,2}|two|three|four)\s+)?quarters?\b",
        )?,
        season: f.re(
            "date_period.season",
            r"\b(?:(?P<order>this|next|last|previous|coming|past|current)\s+)?(?P<season>spring|summer|fall|autumn|winter)\b(?:\s*(?:of\s+)?(?P<year><YEAR4>)\b)?",
        )?,
        which_week: f.re(
            "date_period.which_week",
            r"\b(?:(?:the\s+)?week\s+(?:number\s+)?(?P<number>\d{1,2})|(?:the\s+)?(?P<ordinal>\d{1,2}(?:st|nd|rd|th))\s+week)\b(?:\s+(?:of|in)\s+(?:(?:the\s+)?year\s+)?(?P<year><YEAR4>)\b)?",
        )?,
        rest_of: f.re(
            "date_period.rest_of",
            r"\b(?:the\s+)?rest\s+of\s+(?:the\s+|this\s+)?(?P<unit>week|month|year)\b",
        )?,
        week_of: f.re("date_period.week_of", r"\b(?:the\s+)?week\s+of\s*$")?,
        month_of: f.re("date_period.month_of", r"\b(?:the\s+)?month\s+of\s*$")?,
        now: f.re("date_period.now", r"\b(?:right\s+)?now\b")?,
        ambiguous_month: f.re(
            "date_period.ambiguous_month",
            r"^(?:may|apr|aug|dec|feb|jan|jul|jun|mar|nov|oct|sept?)$",
        )?,
    })
}

fn date_time(f: &Fragments) -> Result<DateTimeRegexes> {
    Ok(DateTimeRegexes {
        now: f.re(
            "date_time.now",
            r"\b(?P<now>(?:right\s+)?now|as\s+soon\s+as\s+possible|asap|recently|previously|at\s+the\s+moment)\b",
        )?,
        connector: f.re("date_time.connector", r"^\s*,?\s*(?:at|on|around|@)?\s*,?\s*$")?,
        time_of_today_before: f.re(
            "date_time.time_of_today_before",
            r"\b(?P<tod>tonight|this\s+(?:morning|afternoon|evening))\s*,?\s*(?:at|around|@)?\s*$",
        )?,
        time_of_today_after: f.re(
            "date_time.time_of_today_after",
            r"^\s*,?\s*(?P<tod>tonight|this\s+(?:morning|afternoon|evening)|(?:morning|afternoon|evening)\s+today)\b",
        )?,
        hour_with_time_of_today: f.re(
            "date_time.hour_with_time_of_today",
            r"\b(?P<hour><HOUR_NUM>|<HOUR_WORDS>)\s*,?\s*(?P<tod>tonight|this\s+(?:morning|afternoon|evening)|(?:morning|afternoon|evening)\s+today)\b",
        )?,
    })
}

fn date_time_period(f: &Fragments) -> Result<DateTimePeriodRegexes> {
    Ok(DateTimePeriodRegexes {
        specific_time_of_day: f.re(
            "date_time_period.specific_time_of_day",
            r"\b(?:(?P<order>this|next|last|previous)\s+(?P<tod>morning|afternoon|evening|night)|(?P<tonight>tonight))\b",
        )?,
        connector: f.re(
            "date_time_period.connector",
            r"^\s*,?\s*(?:on|in|at|during|from)?\s*(?:the\s+)?$",
        )?,
    })
}

// ── Tables ──────────────────────────────────────────────────────────────────

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("tues", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("thurs", Weekday::Thu),
    ("thur", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("sun", Weekday::Sun),
];

const SMALL_NUMBERS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

const TENS: &[(&str, u32)] = &[("twenty", 20), ("thirty", 30), ("forty", 40), ("fifty", 50)];

const ORDINAL_WORDS: &[(&str, u32)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
    ("eleventh", 11),
    ("twelfth", 12),
    ("thirteenth", 13),
    ("fourteenth", 14),
    ("fifteenth", 15),
    ("sixteenth", 16),
    ("seventeenth", 17),
    ("eighteenth", 18),
    ("nineteenth", 19),
    ("twentieth", 20),
    ("thirtieth", 30),
];

const UNITS: &[(&str, &str)] = &[
    ("years", "Y"),
    ("year", "Y"),
    ("yrs", "Y"),
    ("yr", "Y"),
    ("months", "MON"),
    ("month", "MON"),
    ("weeks", "W"),
    ("week", "W"),
    ("wks", "W"),
    ("wk", "W"),
    ("days", "D"),
    ("day", "D"),
    ("hours", "H"),
    ("hour", "H"),
    ("hrs", "H"),
    ("hr", "H"),
    ("h", "H"),
    ("minutes", "M"),
    ("minute", "M"),
    ("mins", "M"),
    ("min", "M"),
    ("seconds", "S"),
    ("second", "S"),
    ("secs", "S"),
    ("sec", "S"),
];

const UNIT_SECONDS: &[(&str, f64)] = &[
    ("Y", 31_536_000.0),
    ("MON", 2_592_000.0),
    ("W", 604_800.0),
    ("D", 86_400.0),
    ("H", 3_600.0),
    ("M", 60.0),
    ("S", 1.0),
];

const SEASONS: &[(&str, &str)] = &[
    ("spring", "SP"),
    ("summer", "SU"),
    ("fall", "FA"),
    ("autumn", "FA"),
    ("winter", "WI"),
];

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn owned<V: Copy>(pairs: &[(&str, V)]) -> HashMap<String, V> {
    pairs.iter().map(|(k, v)| (normalize_key(k), *v)).collect()
}

fn tables() -> Tables {
    let mut numbers = owned(SMALL_NUMBERS);
    for (tens, tv) in TENS {
        numbers.insert(tens.to_string(), *tv);
        for (unit, uv) in &SMALL_NUMBERS[1..10] {
            numbers.insert(format!("{tens} {unit}"), tv + uv);
        }
    }

    let mut day_of_month = HashMap::new();
    for d in 1..=31u32 {
        day_of_month.insert(d.to_string(), d);
        day_of_month.insert(format!("{d:02}"), d);
        day_of_month.insert(format!("{d}{}", ordinal_suffix(d)), d);
    }
    day_of_month.extend(owned(ORDINAL_WORDS));
    for (tens, tv) in [("twenty", 20), ("thirty", 30)] {
        for (unit, uv) in &ORDINAL_WORDS[..9] {
            if tv + uv <= 31 {
                day_of_month.insert(format!("{tens} {unit}"), tv + uv);
            }
        }
    }

    let cardinal = (1..=5u32)
        .flat_map(|n| {
            let word = ORDINAL_WORDS[n as usize - 1].0.to_string();
            [(word, n), (format!("{n}{}", ordinal_suffix(n)), n)]
        })
        .collect();

    Tables {
        month_of_year: owned(MONTHS),
        day_of_week: owned(WEEKDAYS),
        day_of_month,
        cardinal,
        numbers,
        unit: owned(UNITS),
        unit_seconds: UNIT_SECONDS.iter().copied().collect(),
        double_numbers: owned(&[("half", 0.5), ("quarter", 0.25)]),
        season: owned(SEASONS),
    }
}

// ── Culture ─────────────────────────────────────────────────────────────────

/// The English culture.
pub struct English {
    config: CultureConfig,
    lunch: Regex,
    night: Regex,
}

impl English {
    pub fn new() -> Result<Self> {
        let f = Fragments::english();
        let config = CultureConfig {
            tables: tables(),
            numbers: NumberCapability {
                cardinal: Box::new(EnglishNumberExtractor::new(NumberMode::Cardinal)?),
                integer: Box::new(EnglishNumberExtractor::new(NumberMode::Integer)?),
                ordinal: Box::new(EnglishNumberExtractor::new(NumberMode::Ordinal)?),
                parser: Box::new(EnglishNumberParser::new()),
            },
            utility: utility(&f)?,
            duration: duration(&f)?,
            date: date(&f)?,
            time: time(&f)?,
            time_period: time_period(&f)?,
            date_period: date_period(&f)?,
            date_time: date_time(&f)?,
            date_time_period: date_time_period(&f)?,
            min_two_digit_year_past: 40,
            max_two_digit_year_future: 40,
            date_token_prefix: "on ",
            time_token_prefix: "at ",
        };
        Ok(Self {
            config,
            lunch: compile("english.lunch", r"\blunch(?:time)?\b")?,
            night: compile("english.night", r"\b(?:midnight|night)\b")?,
        })
    }
}

impl std::fmt::Debug for English {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("English").finish_non_exhaustive()
    }
}

impl Culture for English {
    fn name(&self) -> &str {
        DEFAULT_CULTURE
    }

    fn config(&self) -> &CultureConfig {
        &self.config
    }
}

impl RelativeWords for English {
    fn swift_day(&self, text: &str) -> Option<i32> {
        let key = normalize_key(text);
        let key = key.strip_prefix("the ").unwrap_or(&key);
        match key {
            "today" | "now" => Some(0),
            "tomorrow" | "tmr" | "next day" | "following day" => Some(1),
            "yesterday" | "previous day" => Some(-1),
            "day after tomorrow" => Some(2),
            "day before yesterday" => Some(-2),
            _ => None,
        }
    }

    fn swift_relative(&self, text: &str) -> Option<i32> {
        let caps = self.config.utility.relative_word.captures(text)?;
        match caps.name("order")?.as_str().to_lowercase().as_str() {
            "next" | "following" | "coming" | "upcoming" => Some(1),
            "last" | "previous" | "past" => Some(-1),
            "this" | "current" => Some(0),
            _ => None,
        }
    }

    fn is_cardinal_last(&self, text: &str) -> bool {
        normalize_key(text) == "last"
    }
}

impl TimeAdjuster for English {
    fn adjust_by_prefix(&self, prefix: &str, adjust: &mut TimeAdjustment) {
        let key = normalize_key(prefix);
        let delta = if key.starts_with("half") {
            30
        } else if key.contains("three quarter") {
            45
        } else if key.contains("quarter") {
            15
        } else {
            let amount: Vec<&str> = key
                .split(' ')
                .take_while(|w| {
                    !matches!(
                        *w,
                        "minute" | "minutes" | "past" | "to" | "after" | "before" | "til"
                    )
                })
                .collect();
            match self.config.tables.number(&amount.join(" ")) {
                Some(n) => n as i32,
                None => return,
            }
        };
        let delta = if key.ends_with(" to") || key.ends_with(" before") || key.ends_with(" til") {
            -delta
        } else {
            delta
        };
        adjust.minute += delta;
        if adjust.minute < 0 {
            adjust.minute += 60;
            adjust.hour = (adjust.hour + 23) % 24;
        }
        adjust.has_minute = true;
    }

    fn adjust_by_suffix(&self, suffix: &str, adjust: &mut TimeAdjustment) {
        let key = normalize_key(suffix);
        let mut delta = 0;
        if key.contains("morning") {
            if adjust.hour >= 12 {
                delta = -12;
            } else {
                adjust.has_am = true;
            }
        } else {
            if adjust.hour < 12 {
                delta = 12;
            }
            if self.lunch.is_match(&key) {
                if (10..=12).contains(&adjust.hour) {
                    delta = 0;
                    if adjust.hour == 12 {
                        adjust.has_pm = true;
                    } else {
                        adjust.has_am = true;
                    }
                } else {
                    adjust.has_pm = true;
                }
            } else if self.night.is_match(&key) {
                if adjust.hour <= 3 || adjust.hour == 12 {
                    if adjust.hour == 12 {
                        adjust.hour = 0;
                    }
                    delta = 0;
                    adjust.has_am = true;
                } else {
                    adjust.has_pm = true;
                }
            } else {
                adjust.has_pm = true;
            }
        }
        adjust.hour = (adjust.hour + delta).rem_euclid(24);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> English {
        English::new().unwrap()
    }

    #[test]
    fn test_all_patterns_compile() {
        let en = english();
        assert_eq!(en.config().date.basic.len(), 7);
        assert_eq!(en.config().time.basic.len(), 8);
    }

    #[test]
    fn test_tables() {
        let t = &english().config.tables;
        assert_eq!(t.month("Sept."), Some(9));
        assert_eq!(t.weekday("Thurs"), Some(Weekday::Thu));
        assert_eq!(t.day("twenty-first"), Some(21));
        assert_eq!(t.day("22nd"), Some(22));
        assert_eq!(t.day("05"), Some(5));
        assert_eq!(t.day("thirty second"), None);
        assert_eq!(t.cardinal("3rd"), Some(3));
        assert_eq!(t.number("forty five"), Some(45));
        assert_eq!(t.number("7"), Some(7));
        assert_eq!(t.unit("Hrs"), Some("H"));
        assert_eq!(t.seconds_per("W"), Some(604_800.0));
        assert_eq!(t.season("autumn"), Some("FA"));
        assert_eq!(t.double_number("half"), Some(0.5));
    }

    #[test]
    fn test_swift_words() {
        let en = english();
        assert_eq!(en.swift_day("The day after tomorrow"), Some(2));
        assert_eq!(en.swift_day("tmr"), Some(1));
        assert_eq!(en.swift_day("someday"), None);
        assert_eq!(en.swift_relative("next month"), Some(1));
        assert_eq!(en.swift_relative("the previous year"), Some(-1));
        assert_eq!(en.swift_relative("this week"), Some(0));
        assert_eq!(en.swift_relative("May"), None);
        assert!(en.is_cardinal_last("Last"));
    }

    fn adjusted(hour: i32, f: impl FnOnce(&English, &mut TimeAdjustment)) -> TimeAdjustment {
        let mut adjust = TimeAdjustment {
            hour,
            ..Default::default()
        };
        f(&english(), &mut adjust);
        adjust
    }

    #[test]
    fn test_prefix_adjustments() {
        let a = adjusted(3, |en, a| en.adjust_by_prefix("half past", a));
        assert_eq!((a.hour, a.minute, a.has_minute), (3, 30, true));
        let a = adjusted(6, |en, a| en.adjust_by_prefix("quarter to", a));
        assert_eq!((a.hour, a.minute), (5, 45));
        let a = adjusted(0, |en, a| en.adjust_by_prefix("ten minutes to", a));
        assert_eq!((a.hour, a.minute), (23, 50));
        let a = adjusted(4, |en, a| en.adjust_by_prefix("20 past", a));
        assert_eq!((a.hour, a.minute), (4, 20));
    }

    #[test]
    fn test_suffix_adjustments() {
        let a = adjusted(7, |en, a| en.adjust_by_suffix("in the evening", a));
        assert_eq!((a.hour, a.has_pm), (19, true));
        let a = adjusted(7, |en, a| en.adjust_by_suffix("in the morning", a));
        assert_eq!((a.hour, a.has_am), (7, true));
        let a = adjusted(11, |en, a| en.adjust_by_suffix("at lunchtime", a));
        assert_eq!((a.hour, a.has_am), (11, true));
        let a = adjusted(2, |en, a| en.adjust_by_suffix("at night", a));
        assert_eq!((a.hour, a.has_am), (2, true));
        let a = adjusted(10, |en, a| en.adjust_by_suffix("at night", a));
        assert_eq!((a.hour, a.has_pm), (22, true));
    }
}
