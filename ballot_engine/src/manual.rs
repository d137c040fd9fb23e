/*!

This is the long-form manual for `ballot_engine` and `judgebox`.

## The contest table

The contest is described by a single table with a header row. The following
columns are recognized, in any order and in any letter case:

* `category` the name of the category. Rows without a category are ignored.
* `entryid` the identifier of the entry, expected to be unique within its
  category. Every row with a category becomes an entry, a repeated id is
  only reported in the logs.
* `title`, `filmmaker`, `description` free text.
* `videourl` a link to the video of the entry. An empty cell means no video.

Other columns are ignored. Missing columns are not an error: the
corresponding fields are simply empty.

```text
Category,EntryID,Title,Filmmaker,Description,VideoURL
Fire,fire_01,Burning Season,Rosa Flores,"Fires, and the people fighting them",https://drive/1
Fire,fire_02,Red Tide,Omar Khalil,,
General News,general_news_01,Paper Trails,Chen Wei,,
```

Fields can be quoted with `"` to contain commas. Quotes cannot be escaped, and
are removed from the values.

Each category also gets an identifier, derived from its name: `General News`
becomes `general_news`, `Video Storyteller of the Year` becomes
`video_storyteller_of_the_year`.

## Judging

A judge opens one category at a time and gives each of the three places to an
entry. Giving a place that is already used moves it to the new entry. Giving
an entry the place it already holds takes the place back.

The ballot can be submitted once the three places are given. Opening another
category before submitting drops the ballot.

## Vote history

When a judge logs in, the votes they already submitted are read back from the
store, keyed by category name:

```text
{
  "Sports": [
    { "entryId": "sports_01", "place": 1 },
    { "entryId": "sports_07", "place": 2 },
    { "entryId": "sports_11", "place": 3 }
  ]
}
```

Every category in the history is shown as done, and opening it restores the
places. If the store cannot be reached, the judge starts with no history.

## Submissions

A submission sent to the store looks like:

```text
{
  "judgeId": "judge1",
  "category": "Fire",
  "timestamp": "2026-03-01T18:30:00.120Z",
  "votes": [
    { "entryId": "fire_02", "place": 2, "title": "Red Tide", "filmmaker": "Omar Khalil" },
    { "entryId": "fire_01", "place": 1, "title": "Burning Season", "filmmaker": "Rosa Flores" },
    { "entryId": "fire_03", "place": 3, "title": "Daybreak", "filmmaker": "Yuki Mori" }
  ]
}
```

*/
